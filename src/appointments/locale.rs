//! Locale-aware formatting for appointment dates and times

use std::fmt;
use std::str::FromStr;

use anyhow::{Error, anyhow};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "tr-TR")]
    Tr,
    #[serde(rename = "en-US")]
    En,
}

impl Locale {
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::Tr => "tr-TR",
            Locale::En => "en-US",
        }
    }

    fn chrono_locale(&self) -> chrono::Locale {
        match self {
            Locale::Tr => chrono::Locale::tr_TR,
            Locale::En => chrono::Locale::en_US,
        }
    }

    /// Long-form calendar date, e.g. "1 Mayıs 2024" or "May 1, 2024"
    pub fn long_date(&self, date: NaiveDate) -> String {
        let fmt = match self {
            Locale::Tr => "%-d %B %Y",
            Locale::En => "%B %-d, %Y",
        };
        date.format_localized(fmt, self.chrono_locale()).to_string()
    }

    /// Two-digit hour and minute clock time
    pub fn short_time(&self, time: NaiveTime) -> String {
        let fmt = match self {
            Locale::Tr => "%H:%M",
            Locale::En => "%I:%M %p",
        };
        time.format(fmt).to_string()
    }

    pub fn unspecified(&self) -> &'static str {
        match self {
            Locale::Tr => "Belirtilmemiş",
            Locale::En => "Unspecified",
        }
    }

    pub fn cancel_failed(&self) -> &'static str {
        match self {
            Locale::Tr => "Randevu iptal edilemedi",
            Locale::En => "Appointment could not be cancelled",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Locale::Tr => "Yaklaşan Randevular",
            Locale::En => "Upcoming Appointments",
        }
    }

    pub fn staff_label(&self) -> &'static str {
        match self {
            Locale::Tr => "Berber",
            Locale::En => "Barber",
        }
    }

    pub fn empty_state(&self) -> &'static str {
        match self {
            Locale::Tr => "Yaklaşan randevunuz bulunmamaktadır.",
            Locale::En => "You have no upcoming appointments.",
        }
    }

    pub fn book_prompt(&self) -> &'static str {
        match self {
            Locale::Tr => "Randevu Al",
            Locale::En => "Book an appointment",
        }
    }

    pub fn confirm_prompt(&self) -> &'static str {
        match self {
            Locale::Tr => {
                "Bu randevuyu iptal etmek istediğinize emin misiniz? Bu işlem geri alınamaz."
            }
            Locale::En => {
                "Are you sure you want to cancel this appointment? This cannot be undone."
            }
        }
    }

    pub fn cancelled(&self) -> &'static str {
        match self {
            Locale::Tr => "Randevu iptal edildi.",
            Locale::En => "Appointment cancelled.",
        }
    }

    pub fn abandoned(&self) -> &'static str {
        match self {
            Locale::Tr => "Vazgeçildi.",
            Locale::En => "Nothing was cancelled.",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tr" | "tr-tr" | "tr_tr" => Ok(Locale::Tr),
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            other => Err(anyhow!("Unsupported locale: {}", other)),
        }
    }
}

/// Timezone that clock times are displayed in
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DisplayZone {
    Local,
    Fixed(FixedOffset),
}

/// Everything the builder needs besides the raw payload: the locale,
/// the display timezone and what "today" is.
#[derive(Clone, Debug, PartialEq)]
pub struct FormatContext {
    pub locale: Locale,
    pub zone: DisplayZone,
    pub today: NaiveDate,
}

impl FormatContext {
    /// Context for the machine's local timezone and current date
    pub fn local(locale: Locale) -> Self {
        Self {
            locale,
            zone: DisplayZone::Local,
            today: Local::now().date_naive(),
        }
    }

    pub fn fixed(locale: Locale, offset: FixedOffset, today: NaiveDate) -> Self {
        Self {
            locale,
            zone: DisplayZone::Fixed(offset),
            today,
        }
    }

    /// Wall-clock time of an instant in the display timezone
    pub fn wall_clock(&self, instant: DateTime<FixedOffset>) -> NaiveTime {
        match self.zone {
            DisplayZone::Local => instant.with_timezone(&Local).time(),
            DisplayZone::Fixed(offset) => instant.with_timezone(&offset).time(),
        }
    }
}
