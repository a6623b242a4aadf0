//! 命令列參數

use anyhow::{bail, Context};
use std::path::PathBuf;

pub const USAGE: &str = "\
用法: fifo-alloc <po.csv> <so.csv> [選項]

選項:
  --out <dir>        輸出目錄（預設: ./allocation）
  --config <file>    分配配置 JSON
  --json             額外輸出 workbook.json
  -h, --help         顯示說明
";

/// 解析後的命令
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run(RunArgs),
    Help,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RunArgs {
    pub po_path: PathBuf,
    pub so_path: PathBuf,
    pub out_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    pub json: bool,
}

impl Command {
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut positional = Vec::new();
        let mut out_dir = PathBuf::from("allocation");
        let mut config_path = None;
        let mut json = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "--out" => {
                    out_dir = args.next().map(PathBuf::from).context("--out 需要目錄參數")?;
                }
                "--config" => {
                    config_path =
                        Some(args.next().map(PathBuf::from).context("--config 需要檔案參數")?);
                }
                "--json" => json = true,
                flag if flag.starts_with("--") => bail!("未知選項: {flag}"),
                _ => positional.push(PathBuf::from(&arg)),
            }
        }

        if positional.len() != 2 {
            bail!("需要兩個輸入檔案（PO 與 SO），實際得到 {} 個\n\n{USAGE}", positional.len());
        }

        let so_path = positional.pop().context("缺少 SO 檔案")?;
        let po_path = positional.pop().context("缺少 PO 檔案")?;

        Ok(Command::Run(RunArgs {
            po_path,
            so_path,
            out_dir,
            config_path,
            json,
        }))
    }
}
