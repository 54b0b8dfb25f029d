// Walk through the basic operations on a small Llrb instance and log
// the outcome of each. Set LLRB_LOG to one of error, warn, info, debug
// or trace to change verbosity, defaults to info.

use std::{env, error};

use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use llrb_rank::Llrb;

fn main() -> Result<(), Box<dyn error::Error>> {
    let level = match env::var("LLRB_LOG") {
        Ok(level) => level.parse::<LevelFilter>()?,
        Err(_) => LevelFilter::Info,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;

    let mut llrb: Llrb<i64, i64> = Llrb::load_from("demo", (0..10).map(|key| (key, key * 100)));
    info!("get(4) = {}", llrb.get(&4)?);
    for key in 4..7 {
        llrb.delete(&key);
    }
    info!("size() = {}", llrb.size());
    info!("rank(9) = {}", llrb.rank(&9));

    llrb.extend((0..20).step_by(2).map(|key| (key, key * 100)));
    info!("ceiling(15) = {:?}", llrb.ceiling(&15));
    info!("floor(15) = {:?}", llrb.floor(&15));
    info!("height() = {}", llrb.height());
    info!("keys() = {:?}", llrb.keys().collect::<Vec<i64>>());
    info!("level_order() = {:?}", llrb.level_order());

    let stats = llrb.validate()?;
    info!("blacks = {:?} entries = {}", stats.blacks(), stats.entries());
    Ok(())
}
