use clap::Parser;
use grocery_request::{cli, config, error, form, interactive, logging};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use grocery_request::camera::FileCamera;
use grocery_request_common::{CategoryKey, DeliveryTime, FormController, Store};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::New(args) => {
            let mut form = new_form(&config)?;

            if let Err(e) = form::apply_draft(&mut form, args.to_draft()).await {
                eprintln!("⚠ 写真を取り込めなかったため送信を中止しました");
                return Err(e);
            }

            eprintln!("{}\n", form::summary(form.request()));
            form::submit(&mut form, !args.no_wait).await?;
        }

        Commands::Fill { no_wait } => {
            let mut form = new_form(&config)?;

            interactive::run_interactive_fill(&mut form).await?;

            eprintln!("\n{}\n", form::summary(form.request()));
            form::submit(&mut form, !no_wait).await?;
        }

        Commands::Options => {
            println!("Stores:");
            for store in Store::ALL {
                println!("  {:<12} {}", store.as_str(), store.label());
            }
            println!("\nDelivery times:");
            for slot in DeliveryTime::ALL {
                println!("  {:<12} {}", slot.as_str(), slot.label());
            }
            println!("\nCategories:");
            for category in CategoryKey::ALL {
                println!("  {:<12} {}", category.as_str(), category.label());
            }
        }

        Commands::Config { set_store, set_time, set_ack_ms, set_quality, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(store) = set_store {
                config.default_store = store;
                changed = true;
            }
            if let Some(slot) = set_time {
                config.default_delivery_time = slot;
                changed = true;
            }
            if let Some(ms) = set_ack_ms {
                config.ack_window_ms = ms;
                changed = true;
            }
            if let Some(quality) = set_quality {
                config.set_jpeg_quality(quality)?;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  既定の店舗: {}", config.default_store);
                println!("  既定の配達時間帯: {}", config.default_delivery_time);
                println!("  送信完了表示: {}ms", config.ack_window_ms);
                println!("  JPEG品質: {}", config.jpeg_quality);
            }
        }
    }

    Ok(())
}

fn new_form(config: &Config) -> Result<form::CliForm> {
    let camera = FileCamera::new(config.jpeg_quality);
    Ok(FormController::with_settings(camera, config.form_settings()?)
        .with_request(config.initial_request()))
}
