//! Declarative component configuration and its validation.
//!
//! A board declares its resources (fonts, displays, ...) by id.  The list
//! component is then configured by referring to those ids:
//!
//! ```text
//! id:              ble_list
//! font:            font_6x10     (required, must be a Font)
//! display:         oled          (required, must be a Display)
//! scroll_interval: 2             (optional, ticks, non-zero)
//! title:           "BLE Devices" (optional)
//! ```
//!
//! [`validate`] is pure: it checks every field against the resource table
//! and reports all problems at once before anything is constructed.

use core::fmt;

use heapless::Vec;

use crate::config::{DEFAULT_SCROLL_INTERVAL_TICKS, MAX_CONFIG_ERRORS, TITLE_CAPACITY};

/// Capability set of a declared resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceKind {
    Font,
    Display,
    Other,
}

/// A resource declared elsewhere in the board configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resource<'a> {
    pub id: &'a str,
    pub kind: ResourceKind,
}

impl<'a> Resource<'a> {
    pub const fn font(id: &'a str) -> Self {
        Self {
            id,
            kind: ResourceKind::Font,
        }
    }

    pub const fn display(id: &'a str) -> Self {
        Self {
            id,
            kind: ResourceKind::Display,
        }
    }
}

/// Configuration slots of the list component, as written by the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComponentConfig<'a> {
    pub id: &'a str,
    pub font: Option<&'a str>,
    pub display: Option<&'a str>,
    pub scroll_interval: Option<u32>,
    pub title: Option<&'a str>,
}

/// Names of the configuration slots, for error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Id,
    Font,
    Display,
    ScrollInterval,
    Title,
}

impl Field {
    pub const fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Font => "font",
            Field::Display => "display",
            Field::ScrollInterval => "scroll_interval",
            Field::Title => "title",
        }
    }
}

/// One problem with one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldError {
    /// A required slot is absent or empty.
    Missing(Field),
    /// The slot names a resource that was never declared.
    UnknownReference(Field),
    /// The referenced resource lacks the required capability.
    WrongKind {
        field: Field,
        expected: ResourceKind,
        found: ResourceKind,
    },
    /// The value is out of range.
    Invalid(Field),
}

impl FieldError {
    pub fn field(&self) -> Field {
        match *self {
            FieldError::Missing(field)
            | FieldError::UnknownReference(field)
            | FieldError::Invalid(field) => field,
            FieldError::WrongKind { field, .. } => field,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Missing(field) => write!(f, "`{}` is required", field.name()),
            FieldError::UnknownReference(field) => {
                write!(f, "`{}` refers to an undeclared resource", field.name())
            }
            FieldError::WrongKind {
                field,
                expected,
                found,
            } => write!(
                f,
                "`{}` must refer to a {:?}, found a {:?}",
                field.name(),
                expected,
                found
            ),
            FieldError::Invalid(field) => write!(f, "`{}` is out of range", field.name()),
        }
    }
}

/// Every error found in one validation pass (up to `MAX_CONFIG_ERRORS`).
pub type ConfigErrors = Vec<FieldError, MAX_CONFIG_ERRORS>;

/// A configuration whose references are known to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidatedConfig<'a> {
    pub id: &'a str,
    pub font: &'a str,
    pub display: &'a str,
    pub scroll_interval: u32,
    pub title: Option<&'a str>,
}

/// Check `config` against the declared `resources`.
pub fn validate<'a>(
    config: &ComponentConfig<'a>,
    resources: &[Resource<'_>],
) -> Result<ValidatedConfig<'a>, ConfigErrors> {
    let mut errors = ConfigErrors::new();

    if config.id.is_empty() {
        let _ = errors.push(FieldError::Missing(Field::Id));
    }

    let font = check_reference(Field::Font, config.font, ResourceKind::Font, resources, &mut errors);
    let display = check_reference(
        Field::Display,
        config.display,
        ResourceKind::Display,
        resources,
        &mut errors,
    );

    let scroll_interval = config.scroll_interval.unwrap_or(DEFAULT_SCROLL_INTERVAL_TICKS);
    if scroll_interval == 0 {
        let _ = errors.push(FieldError::Invalid(Field::ScrollInterval));
    }

    if let Some(title) = config.title {
        if title.len() > TITLE_CAPACITY {
            let _ = errors.push(FieldError::Invalid(Field::Title));
        }
    }

    match (font, display) {
        (Some(font), Some(display)) if errors.is_empty() => Ok(ValidatedConfig {
            id: config.id,
            font,
            display,
            scroll_interval,
            title: config.title,
        }),
        _ => Err(errors),
    }
}

fn check_reference<'a>(
    field: Field,
    reference: Option<&'a str>,
    expected: ResourceKind,
    resources: &[Resource<'_>],
    errors: &mut ConfigErrors,
) -> Option<&'a str> {
    let id = match reference {
        Some(id) if !id.is_empty() => id,
        _ => {
            let _ = errors.push(FieldError::Missing(field));
            return None;
        }
    };

    match resources.iter().find(|r| r.id == id) {
        None => {
            let _ = errors.push(FieldError::UnknownReference(field));
            None
        }
        Some(resource) if resource.kind != expected => {
            let _ = errors.push(FieldError::WrongKind {
                field,
                expected,
                found: resource.kind,
            });
            None
        }
        Some(_) => Some(id),
    }
}
