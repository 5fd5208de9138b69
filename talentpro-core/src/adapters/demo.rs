//! Demo data provider
//!
//! Generates a deterministic sample agency relative to a reference date:
//! - 15 talents, the first two with birthdays in the coming week
//! - 5 lessons on the reference date
//! - a few upcoming schedule events
//! - company sales for the current and previous fiscal year

use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

use crate::domain::{CompanySales, Lesson, MonthlySeries, ScheduleEvent, Talent, TalentStatus};

const DEMO_NAMES: [&str; 15] = [
    "織田 エミリ",
    "徳田 皓己",
    "山中 啓伍",
    "坂本 珠里",
    "杉村 龍之助",
    "黒川 大聖",
    "若林 元太",
    "生田 俊平",
    "山田 杏華",
    "林 純一郎",
    "望月 亮人",
    "村澤 瑠依",
    "ドンジュン",
    "田中 美咲",
    "鈴木 大輔",
];

/// Monthly company sales in thousands of yen, fiscal order
const CURRENT_SALES_K: [i64; 12] = [1200, 1500, 1300, 1600, 1800, 2000, 1900, 2200, 2400, 2500, 2300, 2600];
const PREVIOUS_SALES_K: [i64; 12] = [1000, 1200, 1100, 1300, 1400, 1600, 1500, 1700, 1900, 2000, 1800, 2100];

/// Stable ids so repeated demo resets produce the same records
fn demo_id(kind: u8, index: usize) -> Uuid {
    Uuid::from_u128(0xDE40_0000_0000_0000_0000_0000_0000_0000 | (u128::from(kind) << 32) | index as u128)
}

/// Generate the demo roster
pub fn generate_demo_talents(today: NaiveDate) -> Vec<Talent> {
    DEMO_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            // The first two have birthdays within the next week
            let birthday = if i < 2 {
                let upcoming = today + Duration::days(i as i64 + 1);
                (upcoming.month(), upcoming.day())
            } else {
                ((i % 12) as u32 + 1, (i % 28) as u32 + 1)
            };
            let birth_date = NaiveDate::from_ymd_opt(2000, birthday.0, birthday.1)
                .or_else(|| NaiveDate::from_ymd_opt(2000, birthday.0, 28))
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();

            let mut talent = Talent::new(demo_id(1, i), *name);
            talent.status = TalentStatus::Active;
            talent.sales = 1_000_000 + (i as i64 * 1_337_000) % 5_000_000;
            talent.gender = if i % 5 == 4 { "女" } else { "男" }.to_string();
            talent.email = format!("talent{}@agency.co.jp", i);
            talent.birth_date = birth_date;
            talent.contract_date = "2020-04-01".to_string();
            talent.contract_end_date = format!("{}-{:02}-01", today.year() + 1, (i % 9) + 1);
            talent.rating = (i % 5) as u8 + 1;
            talent.evaluation_note = "特になし".to_string();
            talent.height = (160 + i).to_string();
            talent.weight = (50 + i).to_string();
            talent.bust = "85".to_string();
            talent.waist = "60".to_string();
            talent.hip = "88".to_string();
            talent.shoe_size = "24.5".to_string();
            talent.specialty = "なし".to_string();
            talent.hobby = "なし".to_string();
            talent.bank_name = "〇〇銀行".to_string();
            talent.branch_name = "本店".to_string();
            talent.account_type = "普通".to_string();
            talent.account_number = "1234567".to_string();
            talent.account_holder = name.to_string();
            talent
        })
        .collect()
}

/// Generate the demo lessons, all on the reference date
pub fn generate_demo_lessons(today: NaiveDate) -> Vec<Lesson> {
    (0..5)
        .map(|i| {
            let mut lesson = Lesson::new(
                demo_id(2, i),
                format!("演技特別レッスン {}", i + 1),
                today.format("%Y-%m-%d").to_string(),
            );
            lesson.start_time = "13:00".to_string();
            lesson.end_time = "15:00".to_string();
            lesson.lesson_type = "Acting".to_string();
            lesson.location = "第1スタジオ".to_string();
            lesson.instructor = "田中コーチ".to_string();
            lesson
        })
        .collect()
}

/// Generate upcoming demo events for a few roster members
pub fn generate_demo_events(today: NaiveDate) -> Vec<ScheduleEvent> {
    [
        ("ドラマオーディション", 3, 0),
        ("雑誌撮影", 7, 3),
        ("CM出演", 14, 13),
    ]
    .iter()
    .enumerate()
    .map(|(i, (title, days, talent))| {
        ScheduleEvent::new(
            demo_id(3, i),
            *title,
            (today + Duration::days(*days)).format("%Y-%m-%d").to_string(),
            DEMO_NAMES[*talent],
        )
    })
    .collect()
}

/// Generate demo company sales for both years
pub fn generate_demo_company_sales() -> CompanySales {
    CompanySales {
        current: MonthlySeries::new(CURRENT_SALES_K.map(|k| k * 1000)),
        previous: MonthlySeries::new(PREVIOUS_SALES_K.map(|k| k * 1000)),
    }
}
