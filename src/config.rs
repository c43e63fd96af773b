use crate::surface::Rgb;
use std::f64::consts::FRAC_PI_2;

/// Parameters for one tree render. Never mutated in place; controls build new values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub thickness: f64,
    pub height_factor: f64,
    pub max_depth: u32,
    pub branch_propagation: u32,
    /// Spread between sibling branches, degrees
    pub angle: f64,
    /// Extra orientation of the whole tree, degrees
    pub rotation_angle: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            thickness: 0.5,
            height_factor: 0.65,
            max_depth: 7,
            branch_propagation: 5,
            angle: 36.0,
            rotation_angle: 0.0,
        }
    }
}

impl TreeParams {
    /// Copy with every adjustable value clamped into its control range
    pub fn clamped(self) -> Self {
        Control::ALL
            .iter()
            .fold(self, |params, control| control.set(params, control.get(&params)))
    }

    pub fn with_rotation(self, rotation_angle: f64) -> Self {
        Self { rotation_angle, ..self }
    }
}

/// Fixed geometry and colors of the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Distance from the bottom edge to the trunk base, pixels
    pub ground_offset: f64,
    /// Trunk length as a fraction of surface height
    pub trunk_ratio: f64,
    /// Trunk orientation before rotation, radians
    pub root_orientation: f64,
    pub thickness_decay: f64,
    /// Replaces `height_factor` when set
    pub fixed_height_ratio: Option<f64>,
    pub background: Rgb,
    pub line_color: Rgb,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            ground_offset: 100.0,
            trunk_ratio: 7.0 / 24.0,
            root_orientation: FRAC_PI_2,
            thickness_decay: 2.0 / 3.0,
            fixed_height_ratio: None,
            background: Rgb::BACKGROUND,
            line_color: Rgb::BLACK,
        }
    }
}

impl Layout {
    /// Layout for a rotating tree: the base orientation is 0 and the
    /// rotation angle supplies the rest
    pub fn rotating(self) -> Self {
        Self { root_orientation: 0.0, ..self }
    }
}

/// Length decay used by the fixed-ratio variant
pub const FIXED_HEIGHT_RATIO: f64 = 8.0 / 12.0;

/// Virtual pixel size of one terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    pub width_px: u32,
    pub height_px: u32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self { width_px: 8, height_px: 16 }
    }
}

/// Inclusive range and step of a numeric control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    /// Move by `steps` increments, clamped. Snaps to the `min + k * step`
    /// grid so repeated float additions don't drift.
    pub fn step_by(&self, value: f64, steps: i32) -> f64 {
        let raw = value + self.step * steps as f64;
        let snapped = self.min + ((raw - self.min) / self.step).round() * self.step;
        self.clamp((snapped * 1e6).round() / 1e6)
    }
}

/// The adjustable tree parameters, in panel order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Thickness,
    HeightFactor,
    MaxDepth,
    BranchPropagation,
    Angle,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::Thickness,
        Control::HeightFactor,
        Control::MaxDepth,
        Control::BranchPropagation,
        Control::Angle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Control::Thickness => "Thickness",
            Control::HeightFactor => "Height Factor",
            Control::MaxDepth => "Max Depth",
            Control::BranchPropagation => "Branch Propagation",
            Control::Angle => "Branch Angle",
        }
    }

    pub fn range(self) -> ParamRange {
        match self {
            Control::Thickness => ParamRange::new(0.1, 2.0, 0.1),
            Control::HeightFactor => ParamRange::new(0.25, 0.75, 0.05),
            Control::MaxDepth => ParamRange::new(1.0, 7.0, 1.0),
            Control::BranchPropagation => ParamRange::new(1.0, 10.0, 1.0),
            Control::Angle => ParamRange::new(1.0, 360.0, 6.0),
        }
    }

    pub fn get(self, params: &TreeParams) -> f64 {
        match self {
            Control::Thickness => params.thickness,
            Control::HeightFactor => params.height_factor,
            Control::MaxDepth => params.max_depth as f64,
            Control::BranchPropagation => params.branch_propagation as f64,
            Control::Angle => params.angle,
        }
    }

    /// New params with this control set to `value` (clamped)
    pub fn set(self, params: TreeParams, value: f64) -> TreeParams {
        let v = self.range().clamp(value);
        match self {
            Control::Thickness => TreeParams { thickness: v, ..params },
            Control::HeightFactor => TreeParams { height_factor: v, ..params },
            Control::MaxDepth => TreeParams { max_depth: v.round() as u32, ..params },
            Control::BranchPropagation => TreeParams { branch_propagation: v.round() as u32, ..params },
            Control::Angle => TreeParams { angle: v, ..params },
        }
    }

    /// Value formatted the way the panel shows it
    pub fn format(self, params: &TreeParams) -> String {
        match self {
            Control::Thickness => format!("{:.1}", params.thickness),
            Control::HeightFactor => format!("{:.2}", params.height_factor),
            Control::MaxDepth => params.max_depth.to_string(),
            Control::BranchPropagation => params.branch_propagation.to_string(),
            Control::Angle => format!("{:.0}", params.angle),
        }
    }
}

/// Configuration for a viewer session
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub params: TreeParams,
    pub layout: Layout,
    pub cells: CellMetrics,
    pub rotate: bool,
    /// Rotation tick period, seconds
    pub tick: f32,
}

/// Configuration for one-shot printing
#[derive(Debug, Clone)]
pub struct PrintConfig {
    pub params: TreeParams,
    pub layout: Layout,
    pub cells: CellMetrics,
    pub cols: Option<u16>,
    pub rows: Option<u16>,
    /// Report segment statistics instead of drawing
    pub stats: bool,
}
