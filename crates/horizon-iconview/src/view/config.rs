//! Serializable configuration for an icon view.
//!
//! An [`IconViewConfig`] is a plain value: hosts typically keep one per
//! directory view, persist it as TOML alongside other view settings, and hand
//! it to [`IconView::with_config`](super::IconView::with_config).
//!
//! ```
//! use horizon_iconview::{IconViewConfig, LayoutMode, ZoomLevel};
//!
//! let config = IconViewConfig::from_toml_str(r#"
//!     layout_mode = "columns"
//!     zoom_level = "large"
//!     margin = 8
//! "#).unwrap();
//!
//! assert_eq!(config.layout_mode, LayoutMode::Columns);
//! assert_eq!(config.zoom_level.icon_size(), 64);
//! ```

use std::path::Path;

use horizon_iconview_core::logging::targets;
use serde::{Deserialize, Serialize};

use super::layout::LayoutParams;
use crate::error::{IconViewError, IconViewResult};
use crate::model::SelectionMode;

/// Direction items flow in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Fill rows left to right, then wrap downwards.
    #[default]
    Rows,
    /// Fill columns top to bottom, then wrap rightwards.
    Columns,
}

/// Ambient text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Icon zoom levels, smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomLevel {
    Smallest,
    Smaller,
    Small,
    #[default]
    Normal,
    Large,
    Larger,
    Largest,
}

impl ZoomLevel {
    /// All levels in ascending order.
    pub const ALL: [ZoomLevel; 7] = [
        ZoomLevel::Smallest,
        ZoomLevel::Smaller,
        ZoomLevel::Small,
        ZoomLevel::Normal,
        ZoomLevel::Large,
        ZoomLevel::Larger,
        ZoomLevel::Largest,
    ];

    /// Icon edge length in pixels.
    pub fn icon_size(self) -> i32 {
        match self {
            ZoomLevel::Smallest => 16,
            ZoomLevel::Smaller => 24,
            ZoomLevel::Small => 32,
            ZoomLevel::Normal => 48,
            ZoomLevel::Large => 64,
            ZoomLevel::Larger => 96,
            ZoomLevel::Largest => 128,
        }
    }

    /// Width at which item labels wrap.
    pub fn wrap_width(self) -> i32 {
        match self {
            ZoomLevel::Smallest => 48,
            ZoomLevel::Smaller => 64,
            ZoomLevel::Small => 72,
            ZoomLevel::Normal => 112,
            ZoomLevel::Large | ZoomLevel::Larger | ZoomLevel::Largest => 128,
        }
    }

    /// The next larger level, if any.
    pub fn zoom_in(self) -> Option<ZoomLevel> {
        Self::ALL.get(self as usize + 1).copied()
    }

    /// The next smaller level, if any.
    pub fn zoom_out(self) -> Option<ZoomLevel> {
        (self as usize).checked_sub(1).map(|i| Self::ALL[i])
    }
}

/// Complete configuration of an icon view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconViewConfig {
    pub layout_mode: LayoutMode,
    /// Items per line (columns in rows-flow, rows in columns-flow). `None` fits
    /// the viewport.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    /// Fixed item width. `None` uses each item's preferred width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_width: Option<i32>,
    /// Spacing between the sub-cells of one item.
    pub spacing: i32,
    pub row_spacing: i32,
    pub column_spacing: i32,
    /// Space around the whole grid.
    pub margin: i32,
    /// Padding around each item's preferred size.
    pub item_padding: i32,
    pub text_direction: TextDirection,
    pub selection_mode: SelectionMode,
    pub zoom_level: ZoomLevel,
    /// Activate items on a single click instead of a double click.
    pub single_click: bool,
    /// Distance the pointer must travel after a press before it counts as a drag.
    pub drag_threshold: i32,
    /// Width of the viewport band that triggers auto-scroll.
    pub autoscroll_margin: i32,
    /// Whether drops may land between items.
    pub reorderable: bool,
}

impl Default for IconViewConfig {
    fn default() -> Self {
        Self {
            layout_mode: LayoutMode::Rows,
            columns: None,
            item_width: None,
            spacing: 0,
            row_spacing: 6,
            column_spacing: 6,
            margin: 6,
            item_padding: 0,
            text_direction: TextDirection::LeftToRight,
            selection_mode: SelectionMode::Multiple,
            zoom_level: ZoomLevel::Normal,
            single_click: false,
            drag_threshold: 8,
            autoscroll_margin: 15,
            reorderable: false,
        }
    }
}

impl IconViewConfig {
    /// Parse a configuration from a TOML document. Missing keys take defaults.
    pub fn from_toml_str(source: &str) -> IconViewResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a JSON document. Missing keys take defaults.
    pub fn from_json_str(source: &str) -> IconViewResult<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> IconViewResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Serialize to a JSON document.
    pub fn to_json_string(&self) -> IconViewResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration file. `.json` files are read as JSON, everything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> IconViewResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| IconViewError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loading icon view config");

        if is_json(path) {
            Self::from_json_str(&source)
        } else {
            Self::from_toml_str(&source)
        }
    }

    /// Save the configuration, choosing the format from the extension like [`load`](Self::load).
    pub fn save(&self, path: impl AsRef<Path>) -> IconViewResult<()> {
        let path = path.as_ref();
        let contents = if is_json(path) {
            self.to_json_string()?
        } else {
            self.to_toml_string()?
        };
        std::fs::write(path, contents).map_err(|source| IconViewError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject negative spacing values and zero line capacities.
    pub fn validate(&self) -> IconViewResult<()> {
        let non_negative = [
            ("spacing", self.spacing),
            ("row_spacing", self.row_spacing),
            ("column_spacing", self.column_spacing),
            ("margin", self.margin),
            ("item_padding", self.item_padding),
            ("drag_threshold", self.drag_threshold),
            ("autoscroll_margin", self.autoscroll_margin),
        ];
        for (field, value) in non_negative {
            if value < 0 {
                return Err(IconViewError::InvalidValue {
                    field,
                    value: value.into(),
                    reason: "must not be negative",
                });
            }
        }
        if let Some(width) = self.item_width
            && width <= 0
        {
            return Err(IconViewError::InvalidValue {
                field: "item_width",
                value: width.into(),
                reason: "must be positive",
            });
        }
        if self.columns == Some(0) {
            return Err(IconViewError::InvalidValue {
                field: "columns",
                value: 0,
                reason: "must be positive",
            });
        }
        Ok(())
    }

    /// The layout-relevant subset of this configuration.
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            mode: self.layout_mode,
            columns: self.columns,
            item_width: self.item_width,
            row_spacing: self.row_spacing,
            column_spacing: self.column_spacing,
            margin: self.margin,
            item_padding: self.item_padding,
            direction: self.text_direction,
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
