#[tokio::main]
async fn main() {
    earlyshield::start_server().await;
}
