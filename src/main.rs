use anyhow::{Context, Result};
use chrono::FixedOffset;
use timekit::config::{Config, TimingConfig};
use timekit::constants::DEFAULT_BLOCKING_MSG;
use timekit::logger::LogFacade;
use timekit::timer::Signal;
use timekit::utils::{arithmetic, datetime};
use timekit::{logger, timer};

const USAGE: &str = "Usage: timekit <command>

Commands:
  now                        Current instant as an ISO string
  parse <date>               Date string to epoch milliseconds
  utc <millis>               Epoch milliseconds as a UTC string
  local <millis> [minutes]   Epoch milliseconds in local time, optionally at a fixed offset
  diff <date> <date> <unit>  First date minus second, in <unit>
  add <date> <n> <unit>      Date shifted by n units
  object <date>              Date decomposed into calendar fields (JSON)
  timeout-demo               Cancel a ticking task at the configured deadline
  shutdown-demo              Drain busy workers while a waiter blocks on the signal
  generate-config [path]     Write a default configuration file";

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    logger::init(&config.logging)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        [] | ["now"] => println!("{}", datetime::current_utc_standard_str(false)),
        ["parse", input] => println!("{}", datetime::utc_standard_str_to_timestamp(input)?),
        ["utc", millis] => println!("{}", datetime::to_utc_str(parse_millis(millis)?, &config.display.utc_format)?),
        ["local", millis] => {
            let millis = parse_millis(millis)?;
            let rendered = match config.display.local_offset() {
                Some(offset) => datetime::to_local_str_in(millis, &offset, &config.display.date_time_format)?,
                None => datetime::to_local_str(millis, &config.display.date_time_format)?,
            };
            println!("{}", rendered);
        }
        ["local", millis, minutes] => {
            let minutes: i32 = minutes.parse().with_context(|| format!("Invalid offset: {}", minutes))?;
            let offset = minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .with_context(|| format!("Offset out of range: {}", minutes))?;
            println!(
                "{}",
                datetime::to_local_str_in(parse_millis(millis)?, &offset, &config.display.date_time_format)?
            );
        }
        ["diff", a, b, unit] => {
            let (a, b) = (datetime::parse(a)?, datetime::parse(b)?);
            println!("{}", arithmetic::diff_str(&a, &b, unit)?);
        }
        ["add", input, amount, unit] => {
            let amount: i64 = amount.parse().with_context(|| format!("Invalid amount: {}", amount))?;
            let shifted = arithmetic::add_str(&datetime::parse(input)?, amount, unit)?;
            println!("{}", datetime::to_iso_string(&shifted, false));
        }
        ["object", input] => {
            let object = datetime::to_object(input)?;
            println!("{}", serde_json::to_string_pretty(&object)?);
        }
        ["timeout-demo"] => run_timeout_demo(&config.timing).await,
        ["shutdown-demo"] => run_shutdown_demo(&config.timing).await?,
        ["generate-config"] => Config::generate_default_config(Config::get_default_config_path()?)?,
        ["generate-config", path] => Config::generate_default_config(path)?,
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

fn parse_millis(input: &str) -> Result<i64> {
    input.parse().with_context(|| format!("Invalid timestamp: {}", input))
}

async fn run_timeout_demo(timing: &TimingConfig) {
    let result = timer::timeout_with_cancel(timing.default_timeout(), |token| async move {
        let child = token.child_token();
        let ticker = tokio::spawn(async move {
            while !child.is_cancelled() {
                timer::sleep_ms(1000).await;
                println!("tick");
            }
        });
        ticker.await?;
        Ok::<(), anyhow::Error>(())
    })
    .await;

    if let Err(err) = result {
        eprintln!("❌ {}", err);
    }
    // Let the ticker observe the cancellation before the runtime shuts down.
    timer::sleep_ms(1100).await;
}

async fn run_shutdown_demo(timing: &TimingConfig) -> Result<()> {
    let signal = Signal::running();

    let workers: Vec<_> = (1..=2u64)
        .map(|id| {
            let guard = signal.enter();
            let signal = signal.clone();
            tokio::spawn(async move {
                let _guard = guard;
                while !signal.should_stop() {
                    timer::sleep_ms(500).await;
                }
                // wind-down time grows with the worker id
                timer::sleep_ms(id * 1500).await;
                println!("worker {} stopped", id);
            })
        })
        .collect();

    let waiter = {
        let signal = signal.clone();
        let interval = timing.block_check_interval();
        tokio::spawn(async move {
            signal.block_while_running(DEFAULT_BLOCKING_MSG, interval, &LogFacade).await;
            println!("waiter released");
        })
    };

    timer::sleep_ms(1000).await;
    signal
        .drain(DEFAULT_BLOCKING_MSG, timing.drain_check_interval(), &LogFacade)
        .await;
    println!("drained, waiter still blocked: {}", !waiter.is_finished());

    signal.release();
    waiter.await.context("Waiter task failed")?;
    for worker in workers {
        worker.await.context("Worker task failed")?;
    }
    Ok(())
}
