use std::{error::Error, path::PathBuf};

use serde::Serialize;
use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use crate::{
    drivers::shanwan::report_descriptor::{report_fixup, RDESC_FIXED, RDESC_ORIG_SIZE},
    hid::report::{ReportEnum, ReportType},
};

/// Where the descriptor to show comes from
#[derive(Debug, Clone)]
pub enum DescriptorSource {
    Fixed,
    File(PathBuf),
}

#[derive(Tabled, Serialize)]
struct ReportRow {
    #[tabled(rename = "Type")]
    report_type: String,
    #[tabled(rename = "Report ID")]
    id: u8,
    #[tabled(rename = "Bytes")]
    len: usize,
}

#[derive(Serialize)]
struct DescriptorInfo {
    size: usize,
    fixed_up: bool,
    bytes: Vec<u8>,
    reports: Vec<ReportRow>,
}

/// Print a report descriptor along with the reports it declares
pub fn handle_descriptor(
    source: DescriptorSource,
    json: bool,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let (rdesc, fixed_up) = match source {
        DescriptorSource::Fixed => (RDESC_FIXED.to_vec(), false),
        DescriptorSource::File(path) => {
            let raw = std::fs::read(&path)?;
            if raw.len() != RDESC_ORIG_SIZE {
                log::warn!(
                    "{path:?}: unexpected rdesc of {} bytes, please submit for review",
                    raw.len()
                );
            }
            let fixed = report_fixup(&raw);
            let fixed_up = fixed.as_ptr() != raw.as_ptr();
            (fixed.to_vec(), fixed_up)
        }
    };

    let reports = ReportEnum::parse(&rdesc)?;
    let rows: Vec<ReportRow> = [ReportType::Input, ReportType::Output, ReportType::Feature]
        .into_iter()
        .flat_map(|report_type| reports.reports(report_type).iter())
        .map(|report| ReportRow {
            report_type: format!("{:?}", report.report_type),
            id: report.id,
            len: report.len(),
        })
        .collect();

    if json {
        let info = DescriptorInfo {
            size: rdesc.len(),
            fixed_up,
            bytes: rdesc,
            reports: rows,
        };
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    if fixed_up {
        println!("Report descriptor was replaced by the fixed descriptor");
    }
    println!("Report descriptor ({} bytes):", rdesc.len());
    for line in rdesc.chunks(16) {
        let hex: Vec<String> = line.iter().map(|byte| format!("{byte:02x}")).collect();
        println!("  {}", hex.join(" "));
    }

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header("Reports"));
    println!("{table}");

    Ok(())
}
