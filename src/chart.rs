//! Text rendering of an [`Analysis`]: score lines followed by two bar charts.

use std::io::{self, Write};

use console::{measure_text_width, pad_str, style, Alignment};

use crate::freq::{Bar, ChartSpec, X_LABEL, Y_LABEL};
use crate::Analysis;

pub const DEFAULT_BAR_WIDTH: usize = 40;
/// Widest bar drawn, in block characters.
pub const MAX_BAR_WIDTH: usize = 200;

/// A backend that draws one labeled bar chart.
pub trait ChartRenderer {
    fn render(
        &mut self,
        title: &str,
        x_label: &str,
        y_label: &str,
        bars: &[Bar],
    ) -> io::Result<()>;
}

/// Horizontal bar chart drawn with block characters.
pub struct TerminalChart<W: Write> {
    out: W,
    bar_width: usize,
}

impl<W: Write> TerminalChart<W> {
    pub fn new(out: W, bar_width: usize) -> Self {
        Self {
            out,
            bar_width: bar_width.clamp(1, MAX_BAR_WIDTH),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartRenderer for TerminalChart<W> {
    fn render(
        &mut self,
        title: &str,
        x_label: &str,
        y_label: &str,
        bars: &[Bar],
    ) -> io::Result<()> {
        let label_width = bars
            .iter()
            .map(|bar| measure_text_width(&bar.label))
            .chain(std::iter::once(measure_text_width(x_label)))
            .max()
            .unwrap_or(0);
        let max_count = bars.iter().map(|bar| bar.count).max().unwrap_or(0).max(1);

        writeln!(self.out, "{}", style(title).bold())?;
        writeln!(
            self.out,
            "{}  {}",
            pad_str(x_label, label_width, Alignment::Left, None),
            style(y_label).dim()
        )?;
        for bar in bars {
            // u128 so count * width cannot overflow; at least one block for any non-zero count
            let scaled = bar.count as u128 * self.bar_width as u128 / max_count as u128;
            let len = (scaled as usize).max(usize::from(bar.count > 0));
            writeln!(
                self.out,
                "{}  {} {}",
                pad_str(&bar.label, label_width, Alignment::Left, None),
                style("\u{2588}".repeat(len)).cyan(),
                bar.count
            )?;
        }
        writeln!(self.out)
    }
}

fn render_chart<W: Write, R: ChartRenderer>(
    spec: &ChartSpec,
    out: &mut W,
    renderer: &mut R,
) -> io::Result<()> {
    if spec.is_empty() {
        writeln!(out, "{}", spec.kind.empty_message())?;
        out.flush()
    } else {
        out.flush()?;
        renderer.render(spec.kind.title(), X_LABEL, Y_LABEL, &spec.bars)
    }
}

/// Write perplexity, burstiness and label, then both charts or their
/// empty-state messages.
pub fn render_report<W: Write, R: ChartRenderer>(
    analysis: &Analysis,
    out: &mut W,
    renderer: &mut R,
) -> io::Result<()> {
    writeln!(out, "Perplexity: {}", analysis.perplexity)?;
    writeln!(out, "Burstiness Score: {}", analysis.burstiness)?;
    writeln!(out, "Text Analysis Result: {}", analysis.label)?;
    writeln!(out)?;
    render_chart(&analysis.most_common, out, renderer)?;
    render_chart(&analysis.repeated, out, renderer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Analyzer, Thresholds, UnigramModel, WordListCorpus};

    #[derive(Default)]
    struct Recorder {
        charts: Vec<(String, String, String, Vec<Bar>)>,
    }

    impl ChartRenderer for Recorder {
        fn render(
            &mut self,
            title: &str,
            x_label: &str,
            y_label: &str,
            bars: &[Bar],
        ) -> io::Result<()> {
            self.charts.push((
                title.to_string(),
                x_label.to_string(),
                y_label.to_string(),
                bars.to_vec(),
            ));
            Ok(())
        }
    }

    fn model() -> UnigramModel {
        UnigramModel::train(&WordListCorpus::new(["river", "stone", "river", "."])).unwrap()
    }

    #[test]
    fn report_lists_scores_then_charts() {
        let model = model();
        let analysis = Analyzer::new(&model, Thresholds::default()).analyze("River, stone, river.");
        let mut out = Vec::new();
        let mut recorder = Recorder::default();
        render_report(&analysis, &mut out, &mut recorder).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Perplexity: "));
        assert!(lines[1].starts_with("Burstiness Score: "));
        assert_eq!(
            lines[2],
            "Text Analysis Result: Likely generated by a language model"
        );

        assert_eq!(recorder.charts.len(), 2);
        assert_eq!(recorder.charts[0].0, "Most Common Words");
        assert_eq!(recorder.charts[0].1, "Words");
        assert_eq!(recorder.charts[0].2, "Frequency");
        assert_eq!(recorder.charts[1].0, "Repeated Words");
        assert_eq!(recorder.charts[1].3, vec![Bar { label: "river".into(), count: 2 }]);
    }

    #[test]
    fn empty_analysis_renders_messages_only() {
        let model = model();
        let analysis = Analyzer::new(&model, Thresholds::default()).analyze("the the the");
        let mut out = Vec::new();
        let mut recorder = Recorder::default();
        render_report(&analysis, &mut out, &mut recorder).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Perplexity: undefined"));
        assert!(text.contains("Burstiness Score: undefined"));
        assert!(text.contains("No words to chart."));
        assert!(text.contains("No repeated words found."));
        assert!(recorder.charts.is_empty());
    }

    #[test]
    fn terminal_chart_scales_bars() {
        let mut chart = TerminalChart::new(Vec::new(), 10);
        let bars = vec![
            Bar { label: "river".into(), count: 4 },
            Bar { label: "ox".into(), count: 1 },
        ];
        chart.render("Most Common Words", "Words", "Frequency", &bars).unwrap();
        let text = String::from_utf8(chart.into_inner()).unwrap();
        assert!(text.contains("Most Common Words"));
        assert!(text.contains(&"\u{2588}".repeat(10)));
        let ox_line = text.lines().find(|l| l.starts_with("ox")).unwrap();
        assert_eq!(ox_line.matches('\u{2588}').count(), 2);
        assert!(ox_line.ends_with(" 1"));
    }

    #[test]
    fn oversized_bar_width_is_capped() {
        let mut chart = TerminalChart::new(Vec::new(), usize::MAX);
        let bars = vec![
            Bar { label: "river".into(), count: 2 },
            Bar { label: "ox".into(), count: usize::MAX },
        ];
        chart.render("Repeated Words", "Words", "Frequency", &bars).unwrap();
        let text = String::from_utf8(chart.into_inner()).unwrap();
        for line in text.lines().skip(2).filter(|l| !l.is_empty()) {
            assert!(line.matches('\u{2588}').count() <= MAX_BAR_WIDTH, "{line}");
        }
        let ox_line = text.lines().find(|l| l.starts_with("ox")).unwrap();
        assert_eq!(ox_line.matches('\u{2588}').count(), MAX_BAR_WIDTH);
    }

    #[test]
    fn zero_bar_width_still_draws_a_block() {
        let mut chart = TerminalChart::new(Vec::new(), 0);
        chart.render("T", "Words", "Frequency", &[Bar { label: "ox".into(), count: 3 }]).unwrap();
        let text = String::from_utf8(chart.into_inner()).unwrap();
        let ox_line = text.lines().find(|l| l.starts_with("ox")).unwrap();
        assert_eq!(ox_line.matches('\u{2588}').count(), 1);
    }
}
