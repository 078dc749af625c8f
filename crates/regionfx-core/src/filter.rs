//! The closed set of filters and the single entry point that runs them.
//!
//! A host (settings panel, WASM caller) builds a [`FilterParams`] value, and
//! [`apply`] / [`apply_with`] validate everything up front before touching a
//! pixel. A rejected call leaves the image exactly as it was.
//!
//! Parameters are plain serde data, tagged by `kind`:
//!
//! ```json
//! { "kind": "unsharp_mask", "radius": 2.0, "strength": 0.8 }
//! { "kind": "custom_convolution", "size": 3, "matrix": [[0, "-1", 0], [-1, 5, -1], [0, -1, 0]] }
//! ```

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::buffer::{Image, Region};
use crate::config::FilterSettings;
use crate::convolve::convolve;
use crate::correction::{luma_stretch, rgb_stretch, white_balance};
use crate::error::{FilterError, FilterResult};
use crate::glass::{glass, IrwinHallSampler};
use crate::kernel::{gaussian, unsharp, Kernel};
use crate::median::median;
use crate::transform;

/// Odd window sizes offered for median and custom convolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum KernelSize {
    #[default]
    Three,
    Five,
    Seven,
}

impl KernelSize {
    pub const ALL: [KernelSize; 3] = [KernelSize::Three, KernelSize::Five, KernelSize::Seven];

    /// Side length in pixels.
    pub fn get(self) -> usize {
        match self {
            KernelSize::Three => 3,
            KernelSize::Five => 5,
            KernelSize::Seven => 7,
        }
    }
}

impl TryFrom<u8> for KernelSize {
    type Error = FilterError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(KernelSize::Three),
            5 => Ok(KernelSize::Five),
            7 => Ok(KernelSize::Seven),
            other => Err(FilterError::InvalidParameter {
                name: "size",
                value: other.to_string(),
                reason: "expected 3, 5 or 7".to_string(),
            }),
        }
    }
}

impl From<KernelSize> for u8 {
    fn from(size: KernelSize) -> u8 {
        size.get() as u8
    }
}

/// One cell of a user-entered matrix.
///
/// Free-form entry may produce text, `null`, booleans or nested values;
/// anything that is not a finite number reads as `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatrixCell {
    Number(f64),
    Text(String),
    Other(Unreadable),
}

/// A matrix cell of any other shape. Serializes back as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Unreadable;

impl<'de> Deserialize<'de> for Unreadable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Unreadable)
    }
}

impl Serialize for Unreadable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_none()
    }
}

impl MatrixCell {
    pub fn value(&self) -> f64 {
        self.parsed().unwrap_or(0.0)
    }

    /// True when the cell falls back to `0.0`.
    pub fn is_malformed(&self) -> bool {
        self.parsed().is_none()
    }

    fn parsed(&self) -> Option<f64> {
        let v = match self {
            MatrixCell::Number(v) => *v,
            MatrixCell::Text(s) => s.trim().parse::<f64>().ok()?,
            MatrixCell::Other(_) => return None,
        };
        v.is_finite().then_some(v)
    }
}

impl From<f64> for MatrixCell {
    fn from(v: f64) -> Self {
        MatrixCell::Number(v)
    }
}

/// Filter identity without parameters, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Rotate,
    Scale,
    WhiteBalance,
    LumaStretch,
    RgbStretch,
    GaussianBlur,
    UnsharpMask,
    Median,
    MatteGlass,
    CustomConvolution,
}

impl FilterKind {
    pub const ALL: [FilterKind; 10] = [
        FilterKind::Rotate,
        FilterKind::Scale,
        FilterKind::WhiteBalance,
        FilterKind::LumaStretch,
        FilterKind::RgbStretch,
        FilterKind::GaussianBlur,
        FilterKind::UnsharpMask,
        FilterKind::Median,
        FilterKind::MatteGlass,
        FilterKind::CustomConvolution,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Rotate => "Rotate",
            FilterKind::Scale => "Scale",
            FilterKind::WhiteBalance => "White Balance",
            FilterKind::LumaStretch => "Luma Stretch",
            FilterKind::RgbStretch => "RGB Stretch",
            FilterKind::GaussianBlur => "Gaussian Blur",
            FilterKind::UnsharpMask => "Unsharp Mask",
            FilterKind::Median => "Median",
            FilterKind::MatteGlass => "Matte Glass",
            FilterKind::CustomConvolution => "Custom Convolution",
        }
    }

    /// Whether the filter takes any parameters.
    pub fn has_settings(self) -> bool {
        !matches!(
            self,
            FilterKind::WhiteBalance | FilterKind::LumaStretch | FilterKind::RgbStretch
        )
    }
}

/// A filter together with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterParams {
    WhiteBalance,
    LumaStretch,
    RgbStretch,
    /// `radius` is the Gaussian sigma, in `[0.1, 10]`.
    GaussianBlur { radius: f64 },
    /// `radius` in `[0.1, 10]`, `strength` in `[0.01, 10]`.
    UnsharpMask { radius: f64, strength: f64 },
    Median { size: KernelSize },
    /// `radius` in `[0.1, 100]`, `samples` in `[1, 20]`.
    MatteGlass { radius: f64, samples: u32 },
    /// Degrees about the region center, `[-180, 180]`.
    Rotate { angle_degrees: f64 },
    /// `[0.1, 10]`; values above 1 enlarge.
    Scale { factor: f64 },
    /// Row-major `size` x `size` weights.
    CustomConvolution {
        size: KernelSize,
        matrix: Vec<Vec<MatrixCell>>,
    },
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> FilterResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(FilterError::out_of_range(name, value, min, max));
    }
    Ok(())
}

impl FilterParams {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterParams::WhiteBalance => FilterKind::WhiteBalance,
            FilterParams::LumaStretch => FilterKind::LumaStretch,
            FilterParams::RgbStretch => FilterKind::RgbStretch,
            FilterParams::GaussianBlur { .. } => FilterKind::GaussianBlur,
            FilterParams::UnsharpMask { .. } => FilterKind::UnsharpMask,
            FilterParams::Median { .. } => FilterKind::Median,
            FilterParams::MatteGlass { .. } => FilterKind::MatteGlass,
            FilterParams::Rotate { .. } => FilterKind::Rotate,
            FilterParams::Scale { .. } => FilterKind::Scale,
            FilterParams::CustomConvolution { .. } => FilterKind::CustomConvolution,
        }
    }

    /// Range-check every numeric parameter.
    pub fn validate(&self) -> FilterResult<()> {
        match self {
            FilterParams::WhiteBalance
            | FilterParams::LumaStretch
            | FilterParams::RgbStretch
            | FilterParams::Median { .. } => Ok(()),
            FilterParams::GaussianBlur { radius } => check_range("radius", *radius, 0.1, 10.0),
            FilterParams::UnsharpMask { radius, strength } => {
                check_range("radius", *radius, 0.1, 10.0)?;
                check_range("strength", *strength, 0.01, 10.0)
            }
            FilterParams::MatteGlass { radius, samples } => {
                check_range("radius", *radius, 0.1, 100.0)?;
                if !(1..=20).contains(samples) {
                    return Err(FilterError::out_of_range("samples", *samples, 1, 20));
                }
                Ok(())
            }
            FilterParams::Rotate { angle_degrees } => {
                check_range("angle_degrees", *angle_degrees, -180.0, 180.0)
            }
            FilterParams::Scale { factor } => check_range("factor", *factor, 0.1, 10.0),
            FilterParams::CustomConvolution { size, matrix } => {
                let n = size.get();
                if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
                    return Err(FilterError::InvalidParameter {
                        name: "matrix",
                        value: format!(
                            "{} rows of {:?} cells",
                            matrix.len(),
                            matrix.iter().map(Vec::len).collect::<Vec<_>>()
                        ),
                        reason: format!("expected a {}x{} matrix", n, n),
                    });
                }
                Ok(())
            }
        }
    }

    /// The kernel [`apply_with`] would convolve with.
    ///
    /// `None` for filters that do not convolve and for invalid parameters.
    pub fn kernel(&self, settings: &FilterSettings) -> Option<Kernel> {
        self.validate().ok()?;
        self.build_kernel(settings).ok().flatten()
    }

    /// Assumes `validate` has passed.
    fn build_kernel(&self, settings: &FilterSettings) -> FilterResult<Option<Kernel>> {
        let kernel = match self {
            FilterParams::GaussianBlur { radius } => {
                gaussian(settings.kernel_sizing.half_size(*radius), *radius)
            }
            FilterParams::UnsharpMask { radius, strength } => unsharp(
                settings.kernel_sizing.half_size(*radius),
                *radius,
                *strength,
            ),
            FilterParams::CustomConvolution { size, matrix } => {
                let malformed = matrix.iter().flatten().filter(|c| c.is_malformed()).count();
                if malformed > 0 {
                    debug!(malformed, "non-numeric matrix cells read as 0");
                }
                let data = matrix.iter().flatten().map(MatrixCell::value).collect();
                Kernel::new(size.get(), data)?
            }
            _ => return Ok(None),
        };
        Ok(Some(kernel))
    }
}

#[cfg(feature = "thread-rng")]
fn unseeded_sampler() -> IrwinHallSampler<rand::rngs::ThreadRng> {
    IrwinHallSampler::thread()
}

/// Without OS entropy a missing seed means seed 0.
#[cfg(not(feature = "thread-rng"))]
fn unseeded_sampler() -> IrwinHallSampler<rand::rngs::StdRng> {
    IrwinHallSampler::seeded(0)
}

/// Run `params` over `region` with default [`FilterSettings`].
pub fn apply(image: &mut Image, region: Region, params: &FilterParams) -> FilterResult<()> {
    apply_with(image, region, params, &FilterSettings::default())
}

/// Run `params` over `region`.
///
/// The region, parameters and settings are all checked before the first
/// write. Rotate and scale replace the whole buffer with a freshly built
/// image of the same size; every other filter edits it in place.
///
/// # Errors
/// * `InvalidRegion` - `region` does not fit inside `image`
/// * `InvalidParameter` - a parameter or setting is out of range
pub fn apply_with(
    image: &mut Image,
    region: Region,
    params: &FilterParams,
    settings: &FilterSettings,
) -> FilterResult<()> {
    image.validate()?;
    region.validate(image)?;
    params.validate()?;
    settings.validate()?;
    let kernel = params.build_kernel(settings)?;

    debug!(
        width = image.width,
        height = image.height,
        %region,
        filter = params.kind().name(),
        ?params,
        "apply filter"
    );

    match params {
        FilterParams::WhiteBalance => white_balance(image, region),
        FilterParams::LumaStretch => luma_stretch(image, region, settings.histogram_buckets),
        FilterParams::RgbStretch => rgb_stretch(image, region, settings.histogram_buckets),
        FilterParams::GaussianBlur { .. }
        | FilterParams::UnsharpMask { .. }
        | FilterParams::CustomConvolution { .. } => {
            if let Some(kernel) = &kernel {
                convolve(image, region, kernel);
            }
        }
        FilterParams::Median { size } => median(image, region, size.get()),
        FilterParams::MatteGlass { radius, samples } => match settings.glass_seed {
            Some(seed) => glass(
                image,
                region,
                *radius,
                *samples,
                &mut IrwinHallSampler::seeded(seed),
            ),
            None => glass(image, region, *radius, *samples, &mut unseeded_sampler()),
        },
        FilterParams::Rotate { angle_degrees } => {
            *image = transform::rotate(image, region, *angle_degrees, settings.interpolation);
        }
        FilterParams::Scale { factor } => {
            *image = transform::scale(image, region, *factor, settings.interpolation);
        }
    }
    Ok(())
}
