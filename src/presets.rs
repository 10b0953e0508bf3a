//! Curated plant-like L-systems
//!
//! All presets only use symbols of the basic turtle command set, variables such
//! as `X` are ignored by the turtle.
use crate::{Error, Grammar, Scalar};

/// Bundle of parameters required to render an L-system plant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub axiom: &'static str,
    pub rules: &'static [(&'static str, &'static str)],
    /// Turn angle in degrees
    pub angle: Scalar,
    pub step: Scalar,
    pub iterations: usize,
    pub description: &'static str,
}

/// All presets ordered by name
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "bush",
        axiom: "F",
        rules: &[("F", "FF+[+F-F-F]-[-F+F+F]")],
        angle: 22.5,
        step: 2.5,
        iterations: 4,
        description: "Dense shrub with many short branches creating a rounded canopy",
    },
    Preset {
        name: "fern",
        axiom: "X",
        rules: &[("X", "F[+X]F[-X]+X"), ("F", "FF")],
        angle: 20.0,
        step: 3.0,
        iterations: 5,
        description: "Fractal fern-like plant with repeated fronds",
    },
    Preset {
        name: "weed",
        axiom: "F",
        rules: &[("F", "F[+F]F[-F]F")],
        angle: 22.5,
        step: 5.0,
        iterations: 3,
        description: "Small branching sprout with a few side shoots, good for quick previews",
    },
];

impl Preset {
    /// Find preset by its name
    pub fn by_name(name: &str) -> Result<&'static Preset, Error> {
        PRESETS
            .iter()
            .find(|preset| preset.name == name)
            .ok_or_else(|| Error::UnknownPreset(name.to_owned()))
    }

    pub fn grammar(&self) -> Result<Grammar, Error> {
        Grammar::new(self.axiom, self.rules.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret;

    #[test]
    fn test_lookup() -> Result<(), Error> {
        let names: Vec<_> = PRESETS.iter().map(|preset| preset.name).collect();
        assert_eq!(names, ["bush", "fern", "weed"]);
        assert_eq!(Preset::by_name("fern")?.iterations, 5);
        assert!(matches!(
            Preset::by_name("oak"),
            Err(Error::UnknownPreset(name)) if name == "oak"
        ));
        Ok(())
    }

    #[test]
    fn test_presets_render() -> Result<(), Error> {
        for preset in PRESETS {
            let lstring = preset.grammar()?.expand(preset.iterations);
            let segments = interpret(&lstring, preset.angle, preset.step)?;
            assert!(!segments.is_empty(), "{} draws nothing", preset.name);
        }
        Ok(())
    }

    #[test]
    fn test_weed_size() -> Result<(), Error> {
        let weed = Preset::by_name("weed")?;
        let lstring = weed.grammar()?.expand(weed.iterations);
        // every F produces five F per pass
        assert_eq!(lstring.matches('F').count(), 125);
        Ok(())
    }
}
