use super::colors::{Color, ColorPalette};
use super::section::Section;
use super::{FULL_CIRCLE_DEG, HALF_CIRCLE_DEG};
use serde::Serialize;
use thiserror::Error;

/// A renderable segment of the ring, backed by one section or half of one.
///
/// `start_angle_deg` starts at 0 for the first arc; the chart's start angle is
/// applied by the renderer as a rotation of the whole layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arc {
    pub source_index: usize,
    pub start_angle_deg: f64,
    pub sweep_deg: f64,
    pub color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Arc {
    pub fn end_angle_deg(&self) -> f64 {
        self.start_angle_deg + self.sweep_deg
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidInputError {
    #[error("sum of all the sections' values ({sum}) should not exceed the total ({total})")]
    ExceedsTotal { sum: f64, total: f64 },
    #[error("section {index} has value {value}, expected a positive number")]
    NonPositiveValue { index: usize, value: f64 },
    #[error("total {0} must be a positive finite number")]
    InvalidTotal(f64),
    #[error("thickness {0} is outside 0..=100")]
    ThicknessOutOfRange(f64),
    #[error("size {0} must be positive")]
    NonPositiveSize(f64),
}

/// Whether a sweep is too wide to draw as a single arc primitive.
pub fn needs_split(sweep_deg: f64) -> bool {
    sweep_deg > HALF_CIRCLE_DEG
}

/// Halves a sweep into two equal, adjacent parts.
pub fn split(sweep_deg: f64) -> [f64; 2] {
    let half = sweep_deg / 2.0;
    [half, half]
}

pub fn values_sum<S: AsRef<Section>>(sections: &[S]) -> f64 {
    sections.iter().map(|s| s.as_ref().value).sum()
}

pub fn resolve_total<S: AsRef<Section>>(sections: &[S], total: Option<f64>) -> f64 {
    total.unwrap_or_else(|| values_sum(sections))
}

/// Checks every section value and the sum against `total` without building arcs.
pub fn validate<S: AsRef<Section>>(
    sections: &[S],
    total: Option<f64>,
) -> Result<f64, InvalidInputError> {
    if let Some((index, value)) = sections
        .iter()
        .enumerate()
        .map(|(i, s)| (i, s.as_ref().value))
        .find(|(_, value)| !(value.is_finite() && *value > 0.0))
    {
        return Err(InvalidInputError::NonPositiveValue { index, value });
    }

    let sum = values_sum(sections);
    let total = resolve_total(sections, total);
    if !total.is_finite() || (total <= 0.0 && !sections.is_empty()) {
        return Err(InvalidInputError::InvalidTotal(total));
    }
    if sum > total {
        return Err(InvalidInputError::ExceedsTotal { sum, total });
    }
    Ok(total)
}

/// Lays out `sections` around the ring using the default palette.
pub fn normalize<S: AsRef<Section>>(
    sections: &[S],
    total: Option<f64>,
) -> Result<Vec<Arc>, InvalidInputError> {
    normalize_with(sections, total, &ColorPalette::default())
}

pub fn normalize_with<S: AsRef<Section>>(
    sections: &[S],
    total: Option<f64>,
    palette: &ColorPalette,
) -> Result<Vec<Arc>, InvalidInputError> {
    let total = validate(sections, total)?;

    let mut arcs = Vec::with_capacity(sections.len() + 1);
    let mut cursor = 0.0;

    for (i, section) in sections.iter().enumerate() {
        let section: &Section = section.as_ref();
        let sweep = section.value / total * FULL_CIRCLE_DEG;
        let color = palette.resolve(section.color, i);

        let sweeps = if needs_split(sweep) {
            split(sweep).to_vec()
        } else {
            vec![sweep]
        };

        for part in sweeps {
            arcs.push(Arc {
                source_index: i,
                start_angle_deg: cursor,
                sweep_deg: part,
                color,
                label: section.label.clone(),
            });
            cursor += part;
        }
    }

    log::trace!(
        "laid out {} sections into {} arcs (total {})",
        sections.len(),
        arcs.len(),
        total
    );
    Ok(arcs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::colors::DEFAULT_COLORS;
    use std::rc::Rc;

    const EPS: f64 = 1e-9;

    fn sections(values: &[f64]) -> Vec<Section> {
        values.iter().map(|&v| Section::new(v)).collect()
    }

    fn sweeps(arcs: &[Arc]) -> Vec<f64> {
        arcs.iter().map(|a| a.sweep_deg).collect()
    }

    #[test]
    fn test_equal_quarters() {
        let arcs = normalize(&sections(&[25.0, 25.0, 25.0, 25.0]), None).unwrap();
        assert_eq!(sweeps(&arcs), vec![90.0; 4]);
        assert_eq!(
            arcs.iter().map(|a| a.start_angle_deg).collect::<Vec<_>>(),
            vec![0.0, 90.0, 180.0, 270.0]
        );
    }

    #[test]
    fn test_wide_section_is_split() {
        let arcs = normalize(&sections(&[60.0, 20.0]), None).unwrap();
        assert_eq!(arcs.len(), 3);
        assert_eq!(sweeps(&arcs), vec![135.0, 135.0, 90.0]);
        assert_eq!(
            arcs.iter().map(|a| a.source_index).collect::<Vec<_>>(),
            vec![0, 0, 1]
        );
        assert_eq!(arcs[1].start_angle_deg, 135.0);
        assert_eq!(arcs[2].start_angle_deg, 270.0);
    }

    #[test]
    fn test_total_controls_split() {
        let single = sections(&[90.0]);

        let arcs = normalize(&single, Some(100.0)).unwrap();
        assert_eq!(arcs.len(), 2);
        assert!((arcs[0].sweep_deg - 162.0).abs() < EPS);
        assert!((arcs[1].sweep_deg - 162.0).abs() < EPS);

        let arcs = normalize(&single, Some(200.0)).unwrap();
        assert_eq!(arcs.len(), 1);
        assert!((arcs[0].sweep_deg - 162.0).abs() < EPS);
    }

    #[test]
    fn test_half_circle_is_not_split() {
        assert!(!needs_split(180.0));
        assert!(needs_split(180.000_001));

        let arcs = normalize(&sections(&[50.0, 50.0]), None).unwrap();
        assert_eq!(sweeps(&arcs), vec![180.0, 180.0]);
    }

    #[test]
    fn test_split_halves() {
        let [a, b] = split(270.0);
        assert_eq!(a, 135.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_full_ring_invariants() {
        let cases: Vec<Vec<f64>> = vec![
            vec![1.0],
            vec![3.0, 1.0],
            vec![1.0, 1.0, 7.0],
            vec![0.5, 0.25, 0.125, 0.125],
            vec![10.0, 20.0, 30.0, 40.0, 50.0],
            vec![99.0, 1.0],
        ];

        for values in cases {
            let input = sections(&values);
            let arcs = normalize(&input, None).unwrap();
            let total: f64 = sweeps(&arcs).iter().sum();
            let wide = values
                .iter()
                .filter(|&&v| v / values.iter().sum::<f64>() * 360.0 > 180.0)
                .count();

            assert!((total - 360.0).abs() < EPS, "{values:?}: {total}");
            assert_eq!(arcs.len(), values.len() + wide, "{values:?}");
            assert!(arcs.iter().all(|a| a.sweep_deg <= 180.0), "{values:?}");

            for pair in arcs.windows(2) {
                assert!((pair[0].end_angle_deg() - pair[1].start_angle_deg).abs() < EPS);
                assert!(pair[0].source_index <= pair[1].source_index);
            }
        }
    }

    #[test]
    fn test_partial_ring_with_explicit_total() {
        let arcs = normalize(&sections(&[10.0, 20.0]), Some(40.0)).unwrap();
        assert_eq!(sweeps(&arcs), vec![90.0, 180.0]);
    }

    #[test]
    fn test_exceeding_total_fails() {
        let err = normalize(&sections(&[25.0, 26.0]), Some(50.0)).unwrap_err();
        assert_eq!(
            err,
            InvalidInputError::ExceedsTotal {
                sum: 51.0,
                total: 50.0
            }
        );
        assert!(err.to_string().contains("should not exceed"));

        assert!(normalize(&sections(&[25.0, 25.0]), Some(50.0)).is_ok());
    }

    #[test]
    fn test_non_positive_values_fail() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = normalize(&sections(&[10.0, bad]), None).unwrap_err();
            assert!(
                matches!(err, InvalidInputError::NonPositiveValue { index: 1, .. }),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_invalid_total_fails() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0, -10.0] {
            let err = normalize(&sections(&[60.0, 20.0]), Some(bad)).unwrap_err();
            assert!(matches!(err, InvalidInputError::InvalidTotal(_)), "{bad}");
        }
        assert!(matches!(
            normalize::<Section>(&[], Some(f64::NAN)).unwrap_err(),
            InvalidInputError::InvalidTotal(_)
        ));
        assert!(normalize::<Section>(&[], Some(0.0)).unwrap().is_empty());
    }

    #[test]
    fn test_empty_sections() {
        assert!(normalize::<Section>(&[], None).unwrap().is_empty());
        assert!(normalize::<Section>(&[], Some(100.0)).unwrap().is_empty());
    }

    #[test]
    fn test_default_colors_are_positional() {
        let explicit = Color::from_rgb(0xab, 0xcd, 0xef);
        let input = vec![
            Section::new(25.0),
            Section::new(25.0).with_color(explicit),
            Section::new(25.0),
        ];
        let arcs = normalize(&input, None).unwrap();
        assert_eq!(arcs[0].color, DEFAULT_COLORS[0]);
        assert_eq!(arcs[1].color, explicit);
        assert_eq!(arcs[2].color, DEFAULT_COLORS[2]);

        let plain = normalize(&sections(&[25.0, 25.0, 25.0]), None).unwrap();
        assert_eq!(plain[0].color, arcs[0].color);
        assert_eq!(plain[2].color, arcs[2].color);
    }

    #[test]
    fn test_split_arcs_share_color_and_label() {
        let input = vec![Section::new(90.0).with_label("Big"), Section::new(10.0)];
        let arcs = normalize(&input, None).unwrap();
        assert_eq!(arcs.len(), 3);
        assert_eq!(arcs[0].color, arcs[1].color);
        assert_eq!(arcs[0].label.as_deref(), Some("Big"));
        assert_eq!(arcs[1].label.as_deref(), Some("Big"));
        assert_eq!(arcs[2].label, None);
        assert_eq!(arcs[2].color, DEFAULT_COLORS[1]);
    }

    #[test]
    fn test_sections_are_not_touched() {
        let input: Vec<Rc<Section>> = vec![
            Rc::new(Section::new(10.0).with_name("a")),
            Rc::new(Section::new(30.0)),
        ];
        let before: Vec<Section> = input.iter().map(|s| (**s).clone()).collect();

        normalize(&input, None).unwrap();

        let after: Vec<Section> = input.iter().map(|s| (**s).clone()).collect();
        assert_eq!(before, after);
        assert!(input.iter().all(|s| Rc::strong_count(s) == 1));
    }
}
