#![no_main]

use chrono::NaiveDate;
use lastschrift::core::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut header = GroupHeader::new("MSG", start);
        // Parse → format → parse must be stable.
        if header.set_creation_date_time_string(s).is_ok() {
            let text = header.creation_date_time_string();
            header.set_creation_date_time_string(&text).unwrap();
            assert_eq!(header.creation_date_time_string(), text);
        }
    }
});
