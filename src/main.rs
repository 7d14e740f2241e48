use anyhow::{Context, Result};
use clap::Parser;

use prescout_rs::pipeline::{ResearchContext, run_deep_research, run_quick_research};
use prescout_rs::types::profile::CompanyProfile;
use prescout_rs::types::report::ResearchReport;

#[tokio::main]
async fn main() -> Result<()> {
    let args = prescout_rs::cli::Args::parse();
    let config = args.into_config();
    let context = ResearchContext::new(config)?;

    // 快速模式：读取已有档案，仅补全缺失字段
    if let Some(profile_path) = &args.quick {
        let content = std::fs::read_to_string(profile_path)
            .context(format!("无法读取档案文件: {:?}", profile_path))?;
        let profile: CompanyProfile =
            serde_json::from_str(&content).context("档案文件不是合法的JSON")?;

        match run_quick_research(&context, &profile).await {
            Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
            Err(e) => {
                eprintln!("❌ 快速调研失败: {}", e);
                println!("{}", ResearchReport::failure_wire(&e.to_string()));
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let request = args.into_request();
    match run_deep_research(&context, &request).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report.to_wire())?);
        }
        Err(e) => {
            eprintln!("❌ 深度调研失败: {}", e);
            println!("{}", ResearchReport::failure_wire(&e.to_string()));
            std::process::exit(1);
        }
    }

    Ok(())
}
