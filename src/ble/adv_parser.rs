//! Advertising-data (AD structure) parser.
//!
//! A payload is a sequence of `[len][type][len - 1 bytes of value]`
//! elements.  A zero length byte ends the payload early (padding).

/// AD type: incomplete list of 16-bit service UUIDs.
const AD_UUID16_INCOMPLETE: u8 = 0x02;
/// AD type: complete list of 16-bit service UUIDs.
const AD_UUID16_COMPLETE: u8 = 0x03;
/// AD type: shortened local name.
const AD_NAME_SHORTENED: u8 = 0x08;
/// AD type: complete local name.
const AD_NAME_COMPLETE: u8 = 0x09;

/// Why a payload was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdvError {
    /// An element's length byte points past the end of the payload.
    Truncated,
    /// A UUID16 list has an odd number of bytes.
    BadUuidList,
    /// The local name is not valid UTF-8.
    InvalidName,
}

/// Iterator over `(ad_type, value)` elements of a payload.
///
/// Stops at a zero length byte or the end of the payload; yields one
/// `Truncated` error and then stops if an element overruns.
#[derive(Clone, Debug)]
struct Elements<'a> {
    data: &'a [u8],
}

impl<'a> Iterator for Elements<'a> {
    type Item = Result<(u8, &'a [u8]), AdvError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, rest) = self.data.split_first()?;
        let len = len as usize;
        if len == 0 {
            self.data = &[];
            return None;
        }
        if len > rest.len() {
            self.data = &[];
            return Some(Err(AdvError::Truncated));
        }
        let (element, rest) = rest.split_at(len);
        self.data = rest;
        Some(Ok((element[0], &element[1..])))
    }
}

fn elements(data: &[u8]) -> Elements<'_> {
    Elements { data }
}

/// Fields extracted from one advertisement payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdvFields<'a> {
    /// Local name, complete preferred over shortened.
    pub name: Option<&'a str>,
    name_is_complete: bool,
    /// The validated payload, walked again for service lookups.
    data: &'a [u8],
}

impl<'a> AdvFields<'a> {
    /// Whether any UUID16 list element contains `uuid`.
    pub fn has_service_uuid16(&self, uuid: u16) -> bool {
        let le = uuid.to_le_bytes();
        elements(self.data)
            .map_while(Result::ok)
            .filter(|(ad_type, _)| matches!(*ad_type, AD_UUID16_INCOMPLETE | AD_UUID16_COMPLETE))
            .any(|(_, list)| list.chunks_exact(2).any(|chunk| chunk == le))
    }

    /// The local name, or `""` when the payload carried none.
    pub fn name_or_empty(&self) -> &'a str {
        self.name.unwrap_or("")
    }
}

/// Parse a raw advertisement (or scan response) payload.
pub fn parse_advertisement(data: &[u8]) -> Result<AdvFields<'_>, AdvError> {
    let mut fields = AdvFields {
        data,
        ..Default::default()
    };

    for element in elements(data) {
        let (ad_type, value) = element?;
        match ad_type {
            AD_UUID16_INCOMPLETE | AD_UUID16_COMPLETE => {
                if value.len() % 2 != 0 {
                    return Err(AdvError::BadUuidList);
                }
            }
            AD_NAME_SHORTENED | AD_NAME_COMPLETE => {
                let name = core::str::from_utf8(value).map_err(|_| AdvError::InvalidName)?;
                let complete = ad_type == AD_NAME_COMPLETE;
                if fields.name.is_none() || (complete && !fields.name_is_complete) {
                    fields.name = Some(name);
                    fields.name_is_complete = complete;
                }
            }
            _ => {}
        }
    }

    Ok(fields)
}
