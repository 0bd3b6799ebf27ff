use std::fmt;

use crate::reduce::FinalMapping;

/// Renders `{key=min/mean/max, ...}` with keys in byte order and every number
/// to one decimal place.
impl fmt::Display for FinalMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, stats)) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{}={:.1}/{:.1}/{:.1}",
                key,
                stats.min(),
                stats.mean(),
                stats.max()
            )?;
        }
        f.write_str("}")
    }
}

pub fn render(mapping: &FinalMapping) -> String {
    mapping.to_string()
}
