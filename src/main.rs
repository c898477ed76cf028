use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match event_portal_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
