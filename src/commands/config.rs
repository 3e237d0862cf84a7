use crate::cli::ScanArgs;
use crate::config::FileConfig;
use crate::error::Result;

pub fn run(args: &ScanArgs) -> Result<()> {
    let cfg = FileConfig::resolve(args)?;
    cfg.scan_config().check()?;
    print!("{}", cfg.to_toml()?);
    Ok(())
}
