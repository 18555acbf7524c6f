/// daily weighting - how repayments shape a demand loan's time-weighted balance
use service_charge_rs::calendar::MonthWindow;
use service_charge_rs::summary::daily::{repayments_by_day, weigh_window};
use service_charge_rs::{Money, RepaymentEvent};
use chrono::NaiveDate;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== daily weighting ===\n");

    let day = |d: u32| NaiveDate::from_ymd_opt(2024, 6, d).ok_or("bad date");
    let window = MonthWindow::containing(day(1)?);

    // 1000 outstanding at the end of june, 200 of principal repaid on the 10th
    let events = vec![RepaymentEvent::repayment(7, day(10)?, Money::from_major(230), Money::from_major(200))];
    let by_day = repayments_by_day(&events);

    let weighed = weigh_window(&window, NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("bad date")?, Money::from_major(1_000), &by_day)?;

    println!("window:            {} to {} ({} days)", window.first_day, window.last_day, window.days());
    println!("closing balance:   1000");
    println!("opening balance:   {}", weighed.running_balance);
    println!("weighted sum:      {}", weighed.weighted_sum);
    println!("average balance:   {}", weighed.weighted_sum.div_half_up(window.days().into(), 2)?);

    Ok(())
}
