#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    EaseInOutQuad,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` onto the curve. Input is clamped.
    pub fn apply(self, progress: f64) -> f64 {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            1.0
        };
        match self {
            Self::EaseInOutQuad => ease_in_out_quad(progress),
        }
    }
}

pub fn ease_in_out_quad(p: f64) -> f64 {
    if p < 0.5 {
        2.0 * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(2) / 2.0
    }
}
