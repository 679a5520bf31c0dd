//! # almabuild
//!
//! Command-line page-builder client.

use builder_client::{load_image, write_export, CliArgs, ClientConfig, Command, WorkspaceClient};
use builder_core::{render_elements, EditorSession, ElementType, SaveBlocked, SaveOutcome};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "almabuild=info,builder_core=info,builder_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    let config = ClientConfig::from(&args);
    tracing::debug!(
        "API {} canvas {}x{}",
        config.api_url,
        config.canvas.width,
        config.canvas.height
    );

    let client = WorkspaceClient::new(config.session()?)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(run(&client, &config, args.command))
}

async fn run(
    client: &WorkspaceClient,
    config: &ClientConfig,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::Show { workspace } => {
            let doc = client.fetch_workspace(&workspace).await?;
            let session = EditorSession::from_workspace(doc, config.canvas);
            println!(
                "{} ({}), canvas {}",
                session.name(),
                session.workspace_id(),
                session.canvas_color()
            );
            for node in render_elements(session.store()) {
                println!("{}", serde_json::to_string(&node)?);
            }
        }
        Command::Export { workspace, out } => {
            let doc = client.fetch_workspace(&workspace).await?;
            let session = EditorSession::from_workspace(doc, config.canvas);
            let path = write_export(&session.export(), &out).await?;
            println!("{}", path.display());
        }
        Command::SetColor { workspace, color } => {
            let doc = client.fetch_workspace(&workspace).await?;
            let mut session = EditorSession::from_workspace(doc, config.canvas);
            session.set_canvas_color(&color)?;
            save(client, &mut session).await?;
        }
        Command::AddImage {
            workspace,
            file,
            x,
            y,
        } => {
            let doc = client.fetch_workspace(&workspace).await?;
            let mut session = EditorSession::from_workspace(doc, config.canvas);
            let image = load_image(&file).await?;
            session.drop_palette_item(ElementType::Image, x, y);
            if let Some(editor) = session.editor_mut() {
                editor.set_image(image)?;
            }
            let id = session.commit_editor()?;
            tracing::info!("Added image element {id}");
            save(client, &mut session).await?;
        }
    }
    Ok(())
}

async fn save(client: &WorkspaceClient, session: &mut EditorSession) -> anyhow::Result<()> {
    match client.persist(session).await {
        Ok(SaveOutcome::Saved { .. }) => {
            println!("Saved {}", session.workspace_id());
            Ok(())
        }
        Ok(SaveOutcome::LoginRequired) => {
            anyhow::bail!("session expired, log in again and retry with a fresh --token")
        }
        Ok(SaveOutcome::Failed(message)) => anyhow::bail!("save failed: {message}"),
        Err(SaveBlocked::Clean) => {
            println!("Nothing to save");
            Ok(())
        }
        Err(blocked) => Err(blocked.into()),
    }
}
