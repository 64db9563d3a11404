//! Reads bank-statement exports into [`StatementTransaction`] rows.
//!
//! Expected CSV shape, with headers: `date,amount,memo`. Dates are ISO
//! `YYYY-MM-DD`, amounts in major currency units.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ynab_types::statement::StatementTransaction;

pub fn read_rows(path: &Path) -> Result<Vec<StatementTransaction>, csv::Error> {
    from_reader(File::open(path)?)
}

fn from_reader<R: Read>(input: R) -> Result<Vec<StatementTransaction>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    reader.deserialize().collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn parses_headered_rows() {
        let input = "date,amount,memo\n\
                     2024-01-15,-4.60,COFFEE CO\n\
                     2024-01-16,125.00,SALARY\n";
        let rows = from_reader(input.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(rows[0].amount, -4.60);
        assert_eq!(rows[0].memo, "COFFEE CO");
        assert_eq!(rows[1].memo, "SALARY");
    }

    #[test]
    fn trims_padded_fields() {
        let input = "date,amount,memo\n2024-02-01 ,  9.99 , TRIMMED \n";
        let rows = from_reader(input.as_bytes()).unwrap();

        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(rows[0].amount, 9.99);
        assert_eq!(rows[0].memo, "TRIMMED");
    }

    #[test]
    fn rejects_malformed_dates() {
        let input = "date,amount,memo\n15/01/2024,1.00,BAD DATE\n";
        assert!(from_reader(input.as_bytes()).is_err());
    }

    #[test]
    fn header_only_input_yields_no_rows() {
        let rows = from_reader("date,amount,memo\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }
}
