//! Exports the API payload types as TypeScript bindings for the browser client.
//!
//! Run with: cargo test --test export_ts_types -- --ignored
//!
//! Set TS_RS_EXPORT_DIR to choose where the files are written.

use ts_rs::TS;

#[test]
#[ignore = "Run manually to generate TypeScript types: cargo test --test export_ts_types -- --ignored"]
fn export_typescript_types() {
    recap_core::SummarizePayload::export_all().expect("SummarizePayload");
    recap_core::SummarizeResponse::export_all().expect("SummarizeResponse");
    recap_core::SendEmailPayload::export_all().expect("SendEmailPayload");
    recap_core::SendEmailResponse::export_all().expect("SendEmailResponse");
    recap_core::ErrorResponse::export_all().expect("ErrorResponse");

    println!("TypeScript types exported successfully!");
}
