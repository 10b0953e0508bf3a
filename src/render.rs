//! End to end rendering pipeline
//!
//! `grammar -> expand -> interpret -> rasterize -> encode`, each stage consumes
//! complete output of the previous one.
use crate::{
    grammar::parse_rule, svg, Encoder, Error, Grammar, PngEncoder, Preset, Rasterizer, Scalar,
    Segment, SvgStyle, Turtle,
};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rasterize segments and encode them as PNG file bytes
pub fn render_to_image(
    segments: &[Segment],
    width: usize,
    height: usize,
    margin: Scalar,
) -> Result<Vec<u8>, Error> {
    let rasterizer = Rasterizer::new(width, height, margin)?;
    render_with(segments, rasterizer, &PngEncoder::default())
}

/// Rasterize segments and encode them with the provided encoder
pub fn render_with(
    segments: &[Segment],
    rasterizer: Rasterizer,
    encoder: &dyn Encoder,
) -> Result<Vec<u8>, Error> {
    let canvas = tracing::debug_span!("[rasterize]", width = rasterizer.width())
        .in_scope(|| rasterizer.rasterize(segments))?;
    let bytes = tracing::debug_span!("[encode]", encoder = encoder.name())
        .in_scope(|| encoder.encode(&canvas))?;
    tracing::debug!("[encode:bytes] {}", bytes.len());
    Ok(bytes)
}

/// Every caller facing option of the rendering pipeline
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderConfig {
    pub axiom: String,
    /// Replacement rules keyed by single character symbol
    pub rules: BTreeMap<String, String>,
    pub iterations: usize,
    /// Turn angle in degrees
    pub angle: Scalar,
    pub step: Scalar,
    pub width: usize,
    pub height: usize,
    /// Fraction of the canvas left empty on each side, inside `[0, 0.5)`
    pub margin: Scalar,
    /// Optional bound on the expanded string length in bytes
    pub max_bytes: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            axiom: "F".to_owned(),
            rules: BTreeMap::new(),
            iterations: 0,
            angle: 22.5,
            step: 5.0,
            width: 800,
            height: 600,
            margin: 0.1,
            max_bytes: None,
        }
    }
}

impl RenderConfig {
    /// Configuration reproducing a preset on the default canvas
    pub fn from_preset(preset: &Preset) -> Self {
        Self {
            axiom: preset.axiom.to_owned(),
            rules: preset
                .rules
                .iter()
                .map(|(symbol, value)| (symbol.to_string(), value.to_string()))
                .collect(),
            iterations: preset.iterations,
            angle: preset.angle,
            step: preset.step,
            ..Self::default()
        }
    }

    /// Add rule in the `symbol=replacement` form
    pub fn with_rule(mut self, rule: &str) -> Result<Self, Error> {
        let (symbol, value) = parse_rule(rule)?;
        self.rules.insert(symbol.to_string(), value);
        Ok(self)
    }

    pub fn grammar(&self) -> Result<Grammar, Error> {
        Grammar::new(self.axiom.as_str(), &self.rules)
    }

    pub fn turtle(&self) -> Result<Turtle, Error> {
        Turtle::new(self.angle, self.step)
    }

    pub fn rasterizer(&self) -> Result<Rasterizer, Error> {
        Rasterizer::new(self.width, self.height, self.margin)
    }

    /// Check every option without doing any work
    pub fn validate(&self) -> Result<(), Error> {
        self.prepare().map(|_| ())
    }

    fn prepare(&self) -> Result<(Grammar, Turtle, Rasterizer), Error> {
        let grammar = self.grammar()?;
        let turtle = self.turtle()?;
        let rasterizer = self.rasterizer()?;
        if let Some(limit) = self.max_bytes {
            let length = grammar.expanded_len(self.iterations);
            if length > limit {
                return Err(Error::ExpansionLimit { limit, length });
            }
        }
        Ok((grammar, turtle, rasterizer))
    }

    fn trace(grammar: &Grammar, turtle: &Turtle, iterations: usize) -> Result<Vec<Segment>, Error> {
        let lstring = tracing::debug_span!("[expand]", iterations)
            .in_scope(|| grammar.expand(iterations));
        tracing::debug!("[expand:length] {}", lstring.len());
        let segments =
            tracing::debug_span!("[interpret]").in_scope(|| turtle.interpret(&lstring))?;
        tracing::debug!("[interpret:segments] {}", segments.len());
        Ok(segments)
    }

    /// Expand and interpret the grammar
    pub fn segments(&self) -> Result<Vec<Segment>, Error> {
        let (grammar, turtle, _) = self.prepare()?;
        Self::trace(&grammar, &turtle, self.iterations)
    }

    /// Run the whole pipeline producing PNG file bytes
    pub fn render(&self) -> Result<Vec<u8>, Error> {
        self.render_encoder(&PngEncoder::default())
    }

    /// Run the whole pipeline with a custom encoder
    pub fn render_encoder(&self, encoder: &dyn Encoder) -> Result<Vec<u8>, Error> {
        let (grammar, turtle, rasterizer) = self.prepare()?;
        let segments = Self::trace(&grammar, &turtle, self.iterations)?;
        render_with(&segments, rasterizer, encoder)
    }

    /// Run the pipeline producing SVG document, `margin` becomes padding in user units
    pub fn render_svg(&self, stroke: &str, stroke_width: Scalar) -> Result<String, Error> {
        let (grammar, turtle, _) = self.prepare()?;
        let style = SvgStyle {
            width: self.width,
            height: self.height,
            padding: self.margin * self.width.min(self.height) as Scalar,
            stroke: stroke.to_owned(),
            stroke_width,
        };
        style.validate()?;
        let segments = Self::trace(&grammar, &turtle, self.iterations)?;
        svg::render_svg(&segments, &style)
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
