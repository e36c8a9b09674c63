use chrono::NaiveDate;
use loan_schedule::form::{FormConfig, LoanForm};
use loan_schedule::loan::payment_dates;
use loan_schedule::preference::MemoryStore;
use log::{info, warn};
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();

    let mut store = MemoryStore::new();
    let mut form = LoanForm::with_store(FormConfig::default(), &mut store);
    if let Some(notice) = form.take_notice() {
        warn!("{}", notice);
    }

    form.set_loan_amount("200000");
    form.set_months("18");
    form.set_interest_rate("1.5");

    for error in form.field_errors() {
        warn!("{}", error);
    }

    let schedule = form.schedule();
    let first_pmt_date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    for (row, date) in schedule
        .iter()
        .zip(payment_dates(first_pmt_date, schedule.row_count() as u32))
    {
        println!("{} {}", date, row);
    }

    if let Some(summary) = form.summary() {
        info!("summary: {}", summary);
    }
    if let Err(e) = form.save_rate(&mut store) {
        warn!("{}", e);
    }
}

// verifies that types can implement the gated traits below
#[cfg(test)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<loan_schedule::loan::ScheduleRow>();
    is_normal::<loan_schedule::loan::LoanInput>();
    is_normal::<LoanForm>();
}
