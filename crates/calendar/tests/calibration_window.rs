use palmer_calendar::{CalendarError, CalibrationWindow, Frequency, SeriesLayout};

#[test]
fn weekly_window_counts_in_weeks() {
    let layout = SeriesLayout::new(1980, 2009, Frequency::Weekly).unwrap();
    let window = CalibrationWindow::new(&layout, 1985, 2004).unwrap();
    assert_eq!(window.start_skip_periods(), 5 * 52);
    assert_eq!(window.end_skip_periods(), 5 * 52);
    assert_eq!(window.calibration_periods(), 20 * 52);
}

#[test]
fn every_index_maps_back_to_its_year_and_period() {
    for freq in [Frequency::Monthly, Frequency::Biweekly, Frequency::Quarterly] {
        let layout = SeriesLayout::new(1990, 1995, freq).unwrap();
        for i in 0..layout.n_periods() {
            let year = layout.year_of(i);
            let period = layout.period_of(i);
            assert_eq!(
                layout.index_of(year, period).unwrap(),
                Some(i),
                "{freq}: index {i} -> ({year}, {period})"
            );
        }
    }
}

#[test]
fn calibration_index_membership_matches_year_membership() {
    let layout = SeriesLayout::new(1950, 1980, Frequency::Monthly).unwrap();
    let window = CalibrationWindow::new(&layout, 1955, 1970).unwrap();
    for i in 0..layout.n_periods() {
        assert_eq!(
            window.contains_index(i),
            window.contains_year(layout.year_of(i)),
            "index {i}"
        );
    }
}

#[test]
fn calibration_end_before_start_is_rejected() {
    let layout = SeriesLayout::new(1950, 1980, Frequency::Monthly).unwrap();
    assert_eq!(
        CalibrationWindow::new(&layout, 1970, 1960),
        Err(CalendarError::InvalidCalibrationRange {
            start: 1970,
            end: 1960
        })
    );
}
