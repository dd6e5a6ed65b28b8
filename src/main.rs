use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};
use twin_link::{
    application::usecases::{
        code_execution::CodeExecutionUseCase, live_simulation::LiveSimulationUseCase,
        upload_model::UploadModelUseCase, viewer_config::ViewerConfigUseCase,
    },
    cli::Command,
    config::{config_loader, config_model::DotEnvyConfig},
    domain::value_objects::enums::simulation_channels::SimulationChannel,
    infrastructure::{
        console::sinks::{ConsoleNotifier, LineSink},
        http::{
            api_client::TwinApiClient, code_execution::CodeExecutionHttp,
            model_upload::ModelUploadHttp, simulation::SimulationHttp,
            viewer_token::ViewerTokenHttp,
        },
        socket_io::connection::SocketIoChannel,
    },
    observability,
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("twin-link exited with error: {:?}", error);
        eprintln!("{:#}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("twin-link")?;

    let command = Command::parse(std::env::args().skip(1))?;

    let config = config_loader::load()?;
    info!(stage = %config.stage, base_url = %config.api.base_url, "ENV has been loaded");

    let api = Arc::new(TwinApiClient::new(&config.api)?);

    match command {
        Command::Upload { path } => {
            let notifier = ConsoleNotifier::new(Arc::new(LineSink::stdout("notification")));
            let usecase = UploadModelUseCase::new(
                Arc::new(ModelUploadHttp::new(Arc::clone(&api))),
                Arc::new(notifier),
            );
            usecase.upload_path(&path).await?;
        }
        Command::Live { channel } => live(&config, api, channel).await?,
        Command::Run { path } => {
            let usecase = CodeExecutionUseCase::new(
                Arc::new(CodeExecutionHttp::new(Arc::clone(&api))),
                Arc::new(LineSink::stdout("output")),
            );
            usecase.run_file(&path).await?;
        }
        Command::Viewer { asset_id } => {
            let usecase = ViewerConfigUseCase::new(
                Arc::new(ViewerTokenHttp::new(Arc::clone(&api))),
                config.viewer.clone(),
            );
            let scene = usecase.resolve(asset_id).await?;
            let json = serde_json::to_string_pretty(&scene)
                .context("failed to serialise viewer scene")?;
            println!("{}", json);
        }
    }

    Ok(())
}

async fn live(config: &DotEnvyConfig, api: Arc<TwinApiClient>, channel: SimulationChannel) -> Result<()> {
    let usecase = LiveSimulationUseCase::new(
        Arc::new(SocketIoChannel::new(&config.api.base_url)?),
        Arc::new(SimulationHttp::new(api)),
    );

    let label = match channel {
        SimulationChannel::Motor => "motor-status",
        SimulationChannel::Arm => "arm-status",
    };
    let mut handle = usecase
        .subscribe_and_start(channel, Arc::new(LineSink::stdout(label)))
        .await?;

    let interrupted = tokio::select! {
        _ = shutdown_signal() => true,
        result = handle.wait() => {
            result?;
            info!(%channel, "Server ended the event stream");
            false
        }
    };

    if interrupted {
        handle.close().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to install CTRL+C signal handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
