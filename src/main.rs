use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    carescore_lib::init_tracing();

    match carescore_lib::run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Assessment run failed");
            ExitCode::FAILURE
        }
    }
}
