use chrono::{NaiveDate, TimeZone, Utc};
use fintrack_core::domain::{BillingCycle, DueStatus, Subscription};
use rust_decimal::Decimal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn monthly_billing_clamps_to_the_end_of_short_months() {
    let jan = date(2024, 1, 31);
    let feb = BillingCycle::Monthly.next_date(jan);
    assert_eq!(feb, date(2024, 2, 29));

    // Once clamped, later cycles advance from the clamped day.
    let mar = BillingCycle::Monthly.next_date(feb);
    assert_eq!(mar, date(2024, 3, 29));
}

#[test]
fn monthly_billing_clamps_in_non_leap_februaries() {
    assert_eq!(
        BillingCycle::Monthly.next_date(date(2023, 1, 31)),
        date(2023, 2, 28)
    );
}

#[test]
fn weekly_billing_crosses_month_boundaries() {
    assert_eq!(
        BillingCycle::Weekly.next_date(date(2024, 5, 29)),
        date(2024, 6, 5)
    );
}

#[test]
fn quarterly_billing_advances_three_months_with_clamping() {
    assert_eq!(
        BillingCycle::Quarterly.next_date(date(2023, 11, 30)),
        date(2024, 2, 29)
    );
}

#[test]
fn yearly_billing_maps_leap_day_to_february_28() {
    assert_eq!(
        BillingCycle::Yearly.next_date(date(2024, 2, 29)),
        date(2025, 2, 28)
    );
}

#[test]
fn due_status_boundaries_around_the_seven_day_window() {
    let today = date(2024, 6, 15);

    assert_eq!(DueStatus::classify(date(2024, 6, 14), today), DueStatus::Overdue);
    assert_eq!(DueStatus::classify(today, today), DueStatus::DueSoon);
    assert_eq!(DueStatus::classify(date(2024, 6, 22), today), DueStatus::DueSoon);
    assert_eq!(DueStatus::classify(date(2024, 6, 23), today), DueStatus::Upcoming);
}

#[test]
fn subscription_exposes_its_following_billing_date() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    let sub = Subscription::new(
        "Netflix",
        Decimal::from(15),
        BillingCycle::Quarterly,
        date(2024, 1, 31),
        "",
        "",
        created,
    )
    .unwrap();

    assert_eq!(sub.following_billing_date(), date(2024, 4, 30));
    assert_eq!(sub.due_status(date(2024, 1, 20)), DueStatus::Upcoming);
    assert!(sub.is_due_soon(date(2024, 1, 25)));
}

#[test]
fn subscription_requires_a_name_and_a_positive_amount() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();

    let unnamed = Subscription::new(
        "   ",
        Decimal::from(10),
        BillingCycle::Monthly,
        date(2024, 2, 1),
        "",
        "",
        created,
    );
    assert_eq!(
        unnamed.unwrap_err().to_string(),
        "Name must not be empty"
    );

    let free = Subscription::new(
        "Gym",
        Decimal::ZERO,
        BillingCycle::Monthly,
        date(2024, 2, 1),
        "",
        "",
        created,
    );
    assert_eq!(
        free.unwrap_err().to_string(),
        "Amount must be greater than zero"
    );
}

#[test]
fn cycle_parsing_accepts_any_case_and_rejects_unknown_tokens() {
    assert_eq!("Monthly".parse::<BillingCycle>().unwrap(), BillingCycle::Monthly);
    assert_eq!(" weekly ".parse::<BillingCycle>().unwrap(), BillingCycle::Weekly);

    let err = "fortnightly".parse::<BillingCycle>().unwrap_err();
    assert!(err.to_string().contains("fortnightly"));
}
