use anyhow::bail;
use clap::Parser;
use pantry_ai::{camera, cli, config, render, session, shell};
use camera::CameraSource;
use cli::{Cli, Commands};
use config::Config;
use session::Session;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "pantry_ai=debug,pantry_ai_common=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// 画面エラーがあれば終了コードに反映
fn check(session: &mut Session) -> anyhow::Result<()> {
    if let Some(error) = session.take_error() {
        bail!("{}", error);
    }
    Ok(())
}

fn print_table(session: &mut Session) {
    session.refresh();
    println!("{}", render::render_table(session.state()));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    if let Commands::Config { set_store, set_classifier, set_camera_folder, show } = cli.command {
        let mut config = config;

        if let Some(path) = set_store {
            config.set_store_path(path)?;
            println!("✔ 在庫ファイルを設定しました");
        }

        if let Some(mut command) = set_classifier {
            if command.is_empty() {
                bail!("分類コマンドが空です");
            }
            let program = command.remove(0);
            config.set_classifier(program, command)?;
            println!("✔ 分類コマンドを設定しました");
        }

        if let Some(folder) = set_camera_folder {
            config.set_camera_folder(folder)?;
            println!("✔ 取り込みフォルダを設定しました");
        }

        if show {
            println!("設定:");
            match config.resolve_store_path() {
                Ok(path) => println!("  在庫ファイル: {}", path.display()),
                Err(e) => println!("  在庫ファイル: ({})", e),
            }
            match config.resolve_classifier_command() {
                Ok(command) => println!("  分類コマンド: {} {}", command, config.classifier_args.join(" ")),
                Err(_) => println!("  分類コマンド: 未設定"),
            }
            match &config.camera_folder {
                Some(folder) => println!("  取り込みフォルダ: {}", folder.display()),
                None => println!("  取り込みフォルダ: 未設定"),
            }
            println!("  タイムアウト: {}秒", config.timeout_seconds);
        }
        return Ok(());
    }

    let mut session = Session::open(config, cli.store)?;

    match cli.command {
        Commands::List { page, search } => {
            if let Some(term) = search {
                session.controller_mut().search_for(term).await;
                check(&mut session)?;
            }
            session.controller_mut().set_page(page);
            print_table(&mut session);
        }

        Commands::Add { item, quantity, weight, unit, photo, camera } => {
            let source = match (photo, camera) {
                (Some(path), _) => Some(CameraSource::File(path)),
                (None, true) => match session.config().camera_folder.clone() {
                    Some(folder) => Some(CameraSource::Folder(folder)),
                    None => bail!("取り込みフォルダが未設定です。`pantry-ai config --set-camera-folder DIR` で設定してください"),
                },
                (None, false) => None,
            };

            {
                let form = session.controller_mut().form_mut();
                form.item = item;
                form.quantity = quantity;
                form.weight = weight;
                form.weight_unit = unit;
            }

            if let Some(source) = source {
                println!("📷 写真を分類中...");
                session.capture(&source).await?;
                check(&mut session)?;
                println!("✔ 分類結果: {}", session.state().form.item);
            }

            let added = session.controller_mut().add_item().await;
            check(&mut session)?;
            if added {
                println!("✔ 追加しました");
            }
            print_table(&mut session);
        }

        Commands::Inc { id } => {
            session.controller_mut().increment(&id).await;
            check(&mut session)?;
            print_table(&mut session);
        }

        Commands::Dec { id } => {
            session.controller_mut().decrement(&id).await;
            check(&mut session)?;
            print_table(&mut session);
        }

        Commands::SetQuantity { id, quantity } => {
            session.controller_mut().update_quantity(&id, quantity).await;
            check(&mut session)?;
            print_table(&mut session);
        }

        Commands::Delete { id } => {
            session.controller_mut().delete_item(&id).await;
            check(&mut session)?;
            println!("✔ 削除しました: {}", id);
            print_table(&mut session);
        }

        Commands::Search { term, page } => {
            session.controller_mut().search_for(term).await;
            check(&mut session)?;
            session.controller_mut().set_page(page);
            println!("{}", render::render_table(session.state()));
        }

        Commands::Classify { photo } => {
            let predictions = session.classify(&CameraSource::File(photo)).await?;
            if predictions.is_empty() {
                println!("{}", pantry_ai_common::UNKNOWN_LABEL);
            }
            for prediction in predictions {
                println!("{:<30} {:.3}", prediction.label, prediction.confidence);
            }
        }

        Commands::Shell => {
            println!("🥫 pantry-ai - 対話モード\n");
            shell::run_shell(&mut session).await?;
        }

        Commands::Config { .. } => {}
    }

    session.shutdown();
    Ok(())
}
