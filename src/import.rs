use std::io::Read;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::engine::CalculationRequest;
use crate::models::ReductionTarget;

pub fn read_targets(csv_path: &Path) -> anyhow::Result<Vec<ReductionTarget>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    targets_from_reader(file)
}

pub fn targets_from_reader<R: Read>(reader: R) -> anyhow::Result<Vec<ReductionTarget>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        name: String,
        baseline: f64,
        target: f64,
        current: f64,
        deadline: NaiveDate,
    }

    let mut reader = csv::Reader::from_reader(reader);
    let mut targets = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid target row {}", index + 1))?;
        targets.push(ReductionTarget {
            name: row.name,
            baseline: row.baseline,
            target: row.target,
            current: row.current,
            deadline: row.deadline,
        });
    }

    Ok(targets)
}

pub fn read_companies(csv_path: &Path) -> anyhow::Result<Vec<CalculationRequest>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    companies_from_reader(file)
}

/// Rows of `company,region,employees,revenue` followed by any activity
/// columns. Activity cells are passed through as text so the consumption
/// normaliser applies its usual defaults.
pub fn companies_from_reader<R: Read>(reader: R) -> anyhow::Result<Vec<CalculationRequest>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut requests = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("invalid company row {}", index + 1))?;
        let mut company = None;
        let mut region = None;
        let mut employees = None;
        let mut revenue = None;
        let mut consumption = Map::new();

        for (header, cell) in headers.iter().zip(record.iter()) {
            match header.trim() {
                "company" => company = Some(cell.trim().to_string()).filter(|c| !c.is_empty()),
                "region" => region = Some(cell.trim().to_string()),
                "employees" => employees = Some(parse_number(cell, "employees", index)?),
                "revenue" => revenue = Some(parse_number(cell, "revenue", index)?),
                activity => {
                    consumption.insert(activity.to_string(), Value::String(cell.to_string()));
                }
            }
        }

        requests.push(CalculationRequest {
            company,
            region: region.with_context(|| format!("row {} has no region column", index + 1))?,
            consumption: Value::Object(consumption),
            employees: employees
                .with_context(|| format!("row {} has no employees column", index + 1))?,
            revenue: revenue.with_context(|| format!("row {} has no revenue column", index + 1))?,
        });
    }

    Ok(requests)
}

fn parse_number(cell: &str, column: &str, index: usize) -> anyhow::Result<f64> {
    cell.trim()
        .parse::<f64>()
        .with_context(|| format!("row {}: `{cell}` is not a valid {column}", index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_targets() {
        let csv = "name,baseline,target,current,deadline\n\
                   Electricity,1000,500,800,2030-12-31\n\
                   Water,50,25,50,2028-01-01\n";
        let targets = targets_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].name, "Electricity");
        assert_eq!(targets[0].deadline, NaiveDate::from_ymd_opt(2030, 12, 31).unwrap());
        assert_eq!(targets[1].current, 50.0);
    }

    #[test]
    fn malformed_deadline_is_reported() {
        let csv = "name,baseline,target,current,deadline\nWaste,10,5,8,soon\n";
        let err = targets_from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn reads_company_rows_with_activity_columns() {
        let csv = "company,region,employees,revenue,electricity_kwh,natural_gas_m3\n\
                   Acme,europe,10,1000000,1000,200\n\
                   ,asia,4,250000,,12\n";
        let requests = companies_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].company.as_deref(), Some("Acme"));
        assert_eq!(requests[0].employees, 10.0);
        assert_eq!(requests[0].consumption["electricity_kwh"], "1000");
        assert!(requests[1].company.is_none());
        assert_eq!(requests[1].region, "asia");
    }

    #[test]
    fn company_rows_require_numeric_headcount() {
        let csv = "company,region,employees,revenue\nAcme,europe,many,1000\n";
        assert!(companies_from_reader(csv.as_bytes()).is_err());

        let csv = "company,employees,revenue\nAcme,3,1000\n";
        assert!(companies_from_reader(csv.as_bytes()).is_err());
    }
}
