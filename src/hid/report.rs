//! Report enumeration from a HID report descriptor. Only the item structure
//! and the global state that affects report sizes are tracked; usages are left
//! to the consumer of the reports.
use super::HidError;

/// Type of HID report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportType {
    Input,
    Output,
    Feature,
}

/// A report declared by a report descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HidReport {
    /// Report ID, 0 if the descriptor does not use report IDs
    pub id: u8,
    pub report_type: ReportType,
    /// Size of the report payload in bits, excluding the report ID
    pub size: usize,
}

impl HidReport {
    /// Size of the report payload in bytes, excluding the report ID
    pub fn len(&self) -> usize {
        self.size.div_ceil(8)
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

// Item types
const ITEM_MAIN: u8 = 0;
const ITEM_GLOBAL: u8 = 1;
const ITEM_LONG: u8 = 0xfe;

// Main item tags
const MAIN_INPUT: u8 = 0x8;
const MAIN_OUTPUT: u8 = 0x9;
const MAIN_COLLECTION: u8 = 0xa;
const MAIN_FEATURE: u8 = 0xb;
const MAIN_END_COLLECTION: u8 = 0xc;

// Global item tags
const GLOBAL_REPORT_SIZE: u8 = 0x7;
const GLOBAL_REPORT_ID: u8 = 0x8;
const GLOBAL_REPORT_COUNT: u8 = 0x9;
const GLOBAL_PUSH: u8 = 0xa;
const GLOBAL_POP: u8 = 0xb;

/// Global items that affect report layout
#[derive(Debug, Clone, Copy, Default)]
struct GlobalState {
    report_size: u32,
    report_count: u32,
    report_id: u8,
}

/// All reports declared by a report descriptor, by type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportEnum {
    input: Vec<HidReport>,
    output: Vec<HidReport>,
    feature: Vec<HidReport>,
}

impl ReportEnum {
    /// Walk the items of the given report descriptor and collect the reports
    /// it declares.
    pub fn parse(rdesc: &[u8]) -> Result<Self, HidError> {
        let mut reports = Self::default();
        let mut global = GlobalState::default();
        let mut stack: Vec<GlobalState> = Vec::new();
        let mut collections: usize = 0;
        let mut pos = 0;

        while pos < rdesc.len() {
            let prefix = rdesc[pos];

            if prefix == ITEM_LONG {
                let Some(&size) = rdesc.get(pos + 1) else {
                    return Err(HidError::Parse(format!("truncated long item at {pos}")));
                };
                pos += 3 + size as usize;
                continue;
            }

            let size = match prefix & 0x3 {
                3 => 4,
                n => n as usize,
            };
            let item_type = (prefix >> 2) & 0x3;
            let tag = prefix >> 4;

            let Some(data) = rdesc.get(pos + 1..pos + 1 + size) else {
                return Err(HidError::Parse(format!("truncated item at {pos}")));
            };
            let value = data
                .iter()
                .rev()
                .fold(0u32, |acc, byte| (acc << 8) | *byte as u32);

            match (item_type, tag) {
                (ITEM_GLOBAL, GLOBAL_REPORT_SIZE) => global.report_size = value,
                (ITEM_GLOBAL, GLOBAL_REPORT_COUNT) => global.report_count = value,
                (ITEM_GLOBAL, GLOBAL_REPORT_ID) => {
                    if value == 0 || value > u8::MAX as u32 {
                        return Err(HidError::Parse(format!("invalid report id {value}")));
                    }
                    global.report_id = value as u8;
                }
                (ITEM_GLOBAL, GLOBAL_PUSH) => stack.push(global),
                (ITEM_GLOBAL, GLOBAL_POP) => {
                    let Some(state) = stack.pop() else {
                        return Err(HidError::Parse(format!("global stack underflow at {pos}")));
                    };
                    global = state;
                }
                (ITEM_MAIN, MAIN_COLLECTION) => collections += 1,
                (ITEM_MAIN, MAIN_END_COLLECTION) => {
                    if collections == 0 {
                        return Err(HidError::Parse(format!("unbalanced end collection at {pos}")));
                    }
                    collections -= 1;
                }
                (ITEM_MAIN, MAIN_INPUT) => reports.add_field(ReportType::Input, &global)?,
                (ITEM_MAIN, MAIN_OUTPUT) => reports.add_field(ReportType::Output, &global)?,
                (ITEM_MAIN, MAIN_FEATURE) => reports.add_field(ReportType::Feature, &global)?,
                _ => (),
            }

            pos += 1 + size;
        }

        if collections != 0 {
            return Err(HidError::Parse(format!(
                "{collections} unterminated collection(s)"
            )));
        }

        Ok(reports)
    }

    /// Returns the reports of the given type in declaration order
    pub fn reports(&self, report_type: ReportType) -> &[HidReport] {
        match report_type {
            ReportType::Input => self.input.as_slice(),
            ReportType::Output => self.output.as_slice(),
            ReportType::Feature => self.feature.as_slice(),
        }
    }

    fn add_field(&mut self, report_type: ReportType, global: &GlobalState) -> Result<(), HidError> {
        let bits = global
            .report_size
            .checked_mul(global.report_count)
            .ok_or_else(|| HidError::Parse("report field too large".into()))?
            as usize;
        let list = match report_type {
            ReportType::Input => &mut self.input,
            ReportType::Output => &mut self.output,
            ReportType::Feature => &mut self.feature,
        };

        match list.iter_mut().find(|report| report.id == global.report_id) {
            Some(report) => report.size += bits,
            None => list.push(HidReport {
                id: global.report_id,
                report_type,
                size: bits,
            }),
        }

        Ok(())
    }
}
