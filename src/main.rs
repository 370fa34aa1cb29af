// Copyright © 2025 mailgate
// Licensed under the MIT License

use mimalloc::MiMalloc;
use modules::{
    backend::{client::WildDuckClient, MessageBackend},
    error::MailGateResult,
    logger,
    rest::start_http_server,
    settings::cli::SETTINGS,
};
use std::sync::Arc;
use tracing::info;

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

static LOGO: &str = r#"
  __  __       _ _  ____       _
 |  \/  | __ _(_) |/ ___| __ _| |_ ___
 | |\/| |/ _` | | | |  _ / _` | __/ _ \
 | |  | | (_| | | | |_| | (_| | ||  __/
 |_|  |_|\__,_|_|_|\____|\__,_|\__\___|

"#;

#[tokio::main]
async fn main() -> MailGateResult<()> {
    logger::initialize_logging();
    info!("{}", LOGO);
    info!("Starting mailgate-server");
    info!("Version:  {}", mailgate_version!());
    info!("Git:      [{}]", env!("GIT_HASH"));
    info!("Backend:  {}", SETTINGS.mailgate_backend_url);

    let backend: Arc<dyn MessageBackend> = Arc::new(WildDuckClient::new()?);
    start_http_server(backend).await
}
