use console::style;

#[tokio::main]
async fn main() {
    startlabx::logging::init();
    if let Err(e) = startlabx::cli::run_main().await {
        eprintln!(" {} {e:#}", style("Error:").red());
        std::process::exit(1);
    }
}
