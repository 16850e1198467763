#[tokio::main]
async fn main() {
    let code = vkfetch::app::startup::startup().await;
    std::process::exit(code);
}
