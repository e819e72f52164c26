use crate::generator::Generator;
use crate::global;
use chrono::{DateTime, Utc};

/// Segments is the decoded form of a lexid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Segments {
    /// Unix seconds, or unix nanoseconds when `is_nano`, with the date offset added back.
    pub time: i64,
    pub counter: u32,
    /// The identity suffix, without the leading separator.
    pub identity: String,
    pub is_nano: bool,
}

impl Segments {
    /// Returns the encoded time as a calendar time.
    /// Returns `None` if it falls outside the range chrono can represent.
    pub fn to_time(&self) -> Option<DateTime<Utc>> {
        if self.is_nano {
            Some(DateTime::from_timestamp_nanos(self.time))
        } else {
            DateTime::from_timestamp(self.time, 0)
        }
    }

    /// Render back to an ID using the process-wide default generator.
    pub fn to_id(&self) -> String {
        self.to_id_with(&global::default_generator())
    }

    /// Render back to an ID using `generator`'s layout.
    pub fn to_id_with(&self, generator: &Generator) -> String {
        let identity = format!("{}{}", generator.separator(), self.identity);
        if self.is_nano {
            generator.from_nano_counter_ident(self.time, self.counter, &identity)
        } else {
            generator.from_unix_counter_ident(self.time, self.counter, &identity)
        }
    }
}
