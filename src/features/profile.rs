use crate::features::quantize::QuantizedSwara;
use crate::swara::{SwaraLabel, LABEL_COUNT, POSITIONS};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Count a held note (same label on consecutive samples) as a transition.
    pub count_self_transitions: bool,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self { count_self_transitions: false }
    }
}

/// Swara usage of one recording: how often each label occurs and how often
/// one label moves to another.
///
/// Both tables are relative frequencies indexed by [`SwaraLabel::index`]. The
/// histogram sums to 1 over the quantized samples (0 when there are none);
/// the transition matrix sums to 1 over recorded transitions (0 when there
/// are none).
#[derive(Debug, Clone, PartialEq)]
pub struct SwaraProfile {
    histogram: Array1<f32>,
    transitions: Array2<f32>,
    sample_count: usize,
    transition_count: usize,
}

impl Default for SwaraProfile {
    fn default() -> Self {
        Self {
            histogram: Array1::zeros(LABEL_COUNT),
            transitions: Array2::zeros((LABEL_COUNT, LABEL_COUNT)),
            sample_count: 0,
            transition_count: 0,
        }
    }
}

impl SwaraProfile {
    /// Builds a profile from a quantized track.
    ///
    /// A transition is recorded only between samples whose source indices are
    /// consecutive, so silences and skipped samples break the melodic line.
    ///
    /// # Examples
    /// ```
    /// use raga_detect::features::{ProfileConfig, QuantizedSwara, SwaraProfile};
    /// use raga_detect::swara::SwaraLabel::*;
    /// // Sample 2 was unvoiced, so R2 → P is not a transition.
    /// let swaras = [
    ///     QuantizedSwara { index: 0, timestamp: 0.00, label: S },
    ///     QuantizedSwara { index: 1, timestamp: 0.01, label: R2 },
    ///     QuantizedSwara { index: 3, timestamp: 0.03, label: P },
    /// ];
    /// let profile = SwaraProfile::extract(&swaras, &ProfileConfig::default());
    /// assert_eq!(profile.transition_count(), 1);
    /// assert_eq!(profile.transition(S, R2), 1.0);
    /// ```
    pub fn extract(swaras: &[QuantizedSwara], config: &ProfileConfig) -> SwaraProfile {
        let mut profile = SwaraProfile::default();
        if swaras.is_empty() {
            return profile;
        }

        for swara in swaras {
            profile.histogram[swara.label.index()] += 1.0;
        }
        profile.sample_count = swaras.len();
        profile.histogram /= swaras.len() as f32;

        for pair in swaras.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if to.index != from.index + 1 {
                continue;
            }
            if from.label == to.label && !config.count_self_transitions {
                continue;
            }
            profile.transitions[[from.label.index(), to.label.index()]] += 1.0;
            profile.transition_count += 1;
        }
        if profile.transition_count > 0 {
            profile.transitions /= profile.transition_count as f32;
        }
        profile
    }

    /// Profile of an unbroken label sequence, as if every sample were consecutive.
    ///
    /// # Examples
    /// ```
    /// use raga_detect::features::{ProfileConfig, SwaraProfile};
    /// use raga_detect::swara::SwaraLabel::*;
    /// let profile = SwaraProfile::from_sequence(&[S, R2, G3, R2], &ProfileConfig::default());
    /// assert_eq!(profile.share(R2), 0.5);
    /// assert!((profile.transition(R2, G3) - 1.0 / 3.0).abs() < 1e-6);
    /// ```
    pub fn from_sequence(labels: &[SwaraLabel], config: &ProfileConfig) -> SwaraProfile {
        let swaras: Vec<QuantizedSwara> = labels
            .iter()
            .enumerate()
            .map(|(index, &label)| QuantizedSwara { index, timestamp: index as f32, label })
            .collect();
        SwaraProfile::extract(&swaras, config)
    }

    /// Relative frequency table indexed by [`SwaraLabel::index`].
    pub fn histogram(&self) -> &Array1<f32> {
        &self.histogram
    }

    /// Transition table, rows are the source label and columns the target.
    pub fn transitions(&self) -> &Array2<f32> {
        &self.transitions
    }

    /// Relative frequency of `label`.
    pub fn share(&self, label: SwaraLabel) -> f32 {
        self.histogram[label.index()]
    }

    /// Relative frequency of the step `from` → `to`.
    pub fn transition(&self, from: SwaraLabel, to: SwaraLabel) -> f32 {
        self.transitions[[from.index(), to.index()]]
    }

    /// Number of quantized samples the histogram was built from.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Number of transitions the matrix was built from.
    pub fn transition_count(&self) -> usize {
        self.transition_count
    }

    /// No samples at all; every match score against it is 0.
    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    /// Histogram folded onto the twelve chromatic positions.
    pub fn position_histogram(&self) -> Array1<f32> {
        let mut folded = Array1::zeros(POSITIONS);
        for label in SwaraLabel::ALL {
            folded[label.position()] += self.histogram[label.index()];
        }
        folded
    }

    /// Transition table folded onto the twelve chromatic positions.
    pub fn position_transitions(&self) -> Array2<f32> {
        let mut folded = Array2::zeros((POSITIONS, POSITIONS));
        for from in SwaraLabel::ALL {
            for to in SwaraLabel::ALL {
                folded[[from.position(), to.position()]] += self.transitions[[from.index(), to.index()]];
            }
        }
        folded
    }

    /// Most frequent label; the lowest-indexed one on ties.
    pub fn dominant(&self) -> Option<SwaraLabel> {
        if self.is_empty() {
            return None;
        }
        let mut best = 0;
        for i in 1..LABEL_COUNT {
            if self.histogram[i] > self.histogram[best] {
                best = i;
            }
        }
        SwaraLabel::from_index(best)
    }

    /// Non-zero histogram entries keyed by label.
    pub fn histogram_map(&self) -> BTreeMap<SwaraLabel, f32> {
        SwaraLabel::ALL
            .iter()
            .filter(|label| self.share(**label) > 0.0)
            .map(|&label| (label, self.share(label)))
            .collect()
    }

    /// Non-zero transition entries keyed by `(from, to)`.
    pub fn transition_map(&self) -> BTreeMap<(SwaraLabel, SwaraLabel), f32> {
        let mut map = BTreeMap::new();
        for from in SwaraLabel::ALL {
            for to in SwaraLabel::ALL {
                let value = self.transition(from, to);
                if value > 0.0 {
                    map.insert((from, to), value);
                }
            }
        }
        map
    }
}
