use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::{Error, ErrorKind, Result};

const RFC1123_FORMAT: &[FormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// Format a date as RFC 1123, the representation storage expects in
/// `x-ms-date` headers (e.g. `Sun, 06 Nov 1994 08:49:37 GMT`).
pub fn to_rfc1123(date: &OffsetDateTime) -> Result<String> {
    date.to_offset(time::UtcOffset::UTC)
        .format(&RFC1123_FORMAT)
        .map_err(|e| Error::with_source(ErrorKind::DataConversion, "failed to format date", e))
}
