//! Announcement layout
//!
//! Stacks the fixed blocks of a Pawartos Lelayu top to bottom on the
//! canonical surface. Vertical margins between adjacent blocks collapse to
//! the larger of the two, as they would in a browser.

use doc_model::{
    display_date, or_placeholder, AnnouncementRecord, DocumentModel, EventDetails, MourningParty,
    PLACEHOLDER,
};
use tracing::debug;

use crate::error::Result;
use crate::{
    BidiAnalyzer, Direction, EstimatedMetrics, FontWeight, LineBox, LineBreaker, LineRole,
    MournerLayout, PositionedSpan, Rect, Span, SurfaceGeometry, SurfaceLayout, TextAlign,
    TextColor, TextMeasure, TextStyle, BODY_FONT_SIZE,
};

pub const TITLE: &str = "PAWARTOS LELAYU";
pub const SUBTITLE: &str = "(Berita Dukacita)";
pub const SALUTATION: &str = "Assalamualaikum Wr. Wb.";
pub const INVOCATION: &str = "إِنَّا لِلَّهِ وَإِنَّا إِلَيْهِ رَاجِعُونَ";
pub const TRANSLITERATION: &str = "INNALILLAHI WA INNA ILAIHI ROJI'UN";
pub const LEAD_IN: &str = "Sampun katimbalan sowan wonten ngarso dalem Allah SWT Panjenenganipun:";
pub const DEATH_HEADING: &str = "Almarhum Sedo Rikolo:";
pub const BURIAL_HEADING: &str = "Jenazah Badhedipun Makamaken Wonten Ing:";
pub const CLOSING: &str = "Mekaten atur pawartos lelayu meniko, mugi saget ndadosaken pamrikso.";
pub const MOURNER_HEADING: &str = "Ingkang Nandang Sungkowo:";
pub const MOURNER_PLACEHOLDER: &str = "(Data Pihak Berduka tidak diisi)";
pub const SIGN_OFF: &str = "Wassalamu'alaikum Wr. Wb.";

/// Horizontal gap between grid columns
pub const MOURNER_COLUMN_GAP: f32 = 24.0;

/// The mourner block is never narrower than this
pub const MOURNER_BLOCK_MIN_WIDTH: f32 = 300.0;

const RELATIONSHIP_MARGIN: f32 = 8.0;
const DETAIL_ROW_MARGIN: f32 = 2.0;

/// Horizontal box a paragraph is laid out in
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: f32,
    width: f32,
    align: TextAlign,
}

/// Vertical cursor with collapsing margins
#[derive(Debug, Default)]
struct Flow {
    y: f32,
    pending_margin: f32,
    lines: Vec<LineBox>,
}

impl Flow {
    fn margin(&mut self, margin: f32) {
        self.pending_margin = self.pending_margin.max(margin);
    }

    fn settle(&mut self) -> f32 {
        self.y += self.pending_margin;
        self.pending_margin = 0.0;
        self.y
    }

    fn push(&mut self, lines: Vec<LineBox>) {
        if let Some(last) = lines.last() {
            self.y = self.y.max(last.bounds.bottom());
        }
        self.lines.extend(lines);
    }
}

/// Lays out a [`DocumentModel`] on the canonical surface.
///
/// The result is a pure function of the model and the measurer.
pub struct LayoutEngine<M: TextMeasure = EstimatedMetrics> {
    measure: M,
    geometry: SurfaceGeometry,
    bidi: BidiAnalyzer,
}

impl Default for LayoutEngine<EstimatedMetrics> {
    fn default() -> Self {
        Self::new(EstimatedMetrics::new())
    }
}

impl<M: TextMeasure> LayoutEngine<M> {
    /// Engine on the A4 surface
    pub fn new(measure: M) -> Self {
        Self {
            measure,
            geometry: SurfaceGeometry::a4(),
            bidi: BidiAnalyzer::new(),
        }
    }

    pub fn with_geometry(measure: M, geometry: SurfaceGeometry) -> Result<Self> {
        geometry.validate()?;
        Ok(Self {
            measure,
            geometry,
            bidi: BidiAnalyzer::new(),
        })
    }

    pub fn geometry(&self) -> &SurfaceGeometry {
        &self.geometry
    }

    pub fn measure(&self) -> &M {
        &self.measure
    }

    /// Validate a raw record and lay it out
    pub fn layout_record(&self, record: &AnnouncementRecord) -> Result<SurfaceLayout> {
        let model = DocumentModel::validate(record)?;
        Ok(self.layout(&model))
    }

    pub fn layout(&self, model: &DocumentModel) -> SurfaceLayout {
        let content = Frame {
            x: self.geometry.content_x(),
            width: self.geometry.content_width(),
            align: TextAlign::Center,
        };
        let mut flow = Flow {
            y: self.geometry.padding.top,
            ..Default::default()
        };

        self.title_block(&mut flow, content);
        self.invocation_block(&mut flow, content);
        self.subject_block(&mut flow, content, model);

        self.event_block(
            &mut flow,
            content,
            DEATH_HEADING,
            model.death(),
            None,
            (18.0, 15.0),
        );
        self.event_block(
            &mut flow,
            content,
            BURIAL_HEADING,
            model.burial(),
            Some(model.burial_location()),
            (15.0, 18.0),
        );

        flow.margin(18.0);
        self.paragraph(&mut flow, LineRole::Closing, vec![body(CLOSING)], content);
        flow.margin(20.0);

        let mourner_layout = self.mourner_block(&mut flow, content, model);

        flow.margin(30.0);
        self.paragraph(&mut flow, LineRole::SignOff, vec![body(SIGN_OFF)], content);

        let content_bottom = flow.y;
        let height = self
            .geometry
            .min_height
            .max((content_bottom + self.geometry.padding.bottom).ceil());

        debug!(
            lines = flow.lines.len(),
            height,
            mourners = model.visible_mourner_count(),
            ?mourner_layout,
            "Laid out announcement"
        );

        SurfaceLayout {
            width: self.geometry.width,
            height,
            lines: flow.lines,
            mourner_layout,
            content_bottom,
        }
    }

    fn title_block(&self, flow: &mut Flow, content: Frame) {
        let title = TextStyle::sized(20.0).weight(FontWeight::ExtraBold).spaced(2.0);
        self.paragraph(flow, LineRole::Title, vec![Span::new(TITLE, title)], content);
        flow.margin(5.0);
        self.paragraph(flow, LineRole::Subtitle, vec![Span::new(SUBTITLE, note(12.0))], content);
        flow.margin(18.0);

        self.paragraph(flow, LineRole::Salutation, vec![body(SALUTATION)], content);
        flow.margin(12.0);
    }

    fn invocation_block(&self, flow: &mut Flow, content: Frame) {
        flow.margin(12.0);
        let arabic = TextStyle::sized(16.0).weight(FontWeight::Bold).spaced(1.0);
        self.paragraph(flow, LineRole::Invocation, vec![Span::new(INVOCATION, arabic)], content);
        flow.margin(4.0);
        self.paragraph(
            flow,
            LineRole::Transliteration,
            vec![Span::new(TRANSLITERATION, note(12.0))],
            content,
        );
        flow.margin(12.0);

        self.paragraph(flow, LineRole::LeadIn, vec![body(LEAD_IN)], content);
        flow.margin(15.0);
    }

    fn subject_block(&self, flow: &mut Flow, content: Frame, model: &DocumentModel) {
        flow.margin(15.0);
        let name = TextStyle::sized(24.0).weight(FontWeight::ExtraBold).spaced(1.0);
        self.paragraph(
            flow,
            LineRole::DeceasedName,
            vec![Span::new(model.deceased_name().to_uppercase(), name)],
            content,
        );
        flow.margin(8.0);

        let age = match model.age_years() {
            0 => PLACEHOLDER.to_string(),
            years => years.to_string(),
        };
        let age_style = TextStyle::sized(14.0).weight(FontWeight::SemiBold);
        self.paragraph(
            flow,
            LineRole::Age,
            vec![Span::new(format!("Yuswa: {} Taun", age), age_style)],
            content,
        );
        flow.margin(5.0);

        let strong = TextStyle::default().weight(FontWeight::Bold);
        self.paragraph(
            flow,
            LineRole::Residence,
            vec![
                body("Ingkang pidalem wonten ing Padukuhan "),
                Span::new(model.residence_area(), strong),
                body(", Kalurahan Krembangan"),
            ],
            content,
        );
        flow.margin(15.0);
    }

    fn event_block(
        &self,
        flow: &mut Flow,
        content: Frame,
        heading: &str,
        event: &EventDetails,
        location: Option<&str>,
        (margin_top, margin_bottom): (f32, f32),
    ) {
        flow.margin(margin_top);
        let heading_style = TextStyle::sized(14.0)
            .weight(FontWeight::Bold)
            .color(TextColor::DARK);
        self.paragraph(
            flow,
            LineRole::SectionHeading,
            vec![Span::new(heading, heading_style)],
            content,
        );
        flow.margin(6.0);

        let mut rows = vec![
            ("Dinten", or_placeholder(&event.day_label).to_string()),
            ("Tanggal", display_date(&event.date)),
            ("Wanci Jam", format!("{} WIB", or_placeholder(&event.time))),
        ];
        if let Some(location) = location {
            rows.push(("Makam", or_placeholder(location).to_string()));
        }

        let value_style = TextStyle::default().weight(FontWeight::SemiBold);
        for (label, value) in rows {
            flow.margin(DETAIL_ROW_MARGIN);
            self.paragraph(
                flow,
                LineRole::Detail,
                vec![body(&format!("{} : ", label)), Span::new(value, value_style)],
                content,
            );
            flow.margin(DETAIL_ROW_MARGIN);
        }
        flow.margin(margin_bottom);
    }

    fn mourner_block(&self, flow: &mut Flow, content: Frame, model: &DocumentModel) -> MournerLayout {
        let heading = TextStyle::sized(14.0).weight(FontWeight::Bold);
        self.paragraph(
            flow,
            LineRole::MournerHeading,
            vec![Span::new(MOURNER_HEADING, heading)],
            content,
        );
        // heading padding
        flow.y += 5.0;
        flow.margin(8.0);

        let visible: Vec<&MourningParty> = model.visible_mourners().collect();
        let layout = MournerLayout::for_count(visible.len());

        if visible.is_empty() {
            self.paragraph(
                flow,
                LineRole::MournerPlaceholder,
                vec![Span::new(
                    MOURNER_PLACEHOLDER,
                    TextStyle::sized(12.0).italic().color(TextColor::FAINT),
                )],
                content,
            );
            return layout;
        }

        flow.margin(5.0);
        let cells: Vec<Vec<Span>> = visible.iter().map(|m| mourner_spans(m)).collect();

        match layout {
            MournerLayout::SingleColumn => {
                for spans in cells {
                    self.paragraph(flow, LineRole::Mourner, spans, content);
                    flow.margin(DETAIL_ROW_MARGIN);
                }
            }
            MournerLayout::Grid { columns } => {
                let breaker = LineBreaker::new(&self.measure);
                let gaps = MOURNER_COLUMN_GAP * (columns.saturating_sub(1)) as f32;
                let natural = cells
                    .iter()
                    .map(|spans| breaker.spans_width(spans))
                    .fold(0.0_f32, f32::max);
                let grid_width = (natural * columns as f32 + gaps)
                    .max(MOURNER_BLOCK_MIN_WIDTH)
                    .min(content.width);
                let column_width = (grid_width - gaps) / columns as f32;
                let grid_x = content.x + (content.width - grid_width) / 2.0;

                let mut row_top = flow.y;
                for (index, spans) in cells.into_iter().enumerate() {
                    let (_, column) = layout.cell_position(index);
                    if column == 0 {
                        row_top = flow.settle();
                    }
                    let frame = Frame {
                        x: grid_x + column as f32 * (column_width + MOURNER_COLUMN_GAP),
                        width: column_width,
                        align: TextAlign::Left,
                    };
                    let lines = self.lay_lines(LineRole::Mourner, &spans, frame, row_top);
                    flow.push(lines);
                    if column + 1 == columns {
                        flow.margin(DETAIL_ROW_MARGIN);
                    }
                }
                flow.margin(DETAIL_ROW_MARGIN);
            }
        }

        layout
    }

    fn paragraph(&self, flow: &mut Flow, role: LineRole, spans: Vec<Span>, frame: Frame) {
        let top = flow.settle();
        let lines = self.lay_lines(role, &spans, frame, top);
        flow.push(lines);
    }

    /// Break and position one paragraph starting at `top`
    fn lay_lines(&self, role: LineRole, spans: &[Span], frame: Frame, top: f32) -> Vec<LineBox> {
        let breaker = LineBreaker::new(&self.measure);
        let mut y = top;
        let mut out = Vec::new();

        for line in breaker.break_spans(spans, frame.width) {
            let logical: String = line.spans.iter().map(|s| s.text.as_str()).collect();
            let direction = self.bidi.detect_base_direction(&logical);
            let mut spans = line.spans;
            if self.bidi.has_rtl(&logical) {
                for span in &mut spans {
                    span.text = self.bidi.visual_line(&span.text).text;
                }
                if direction == Direction::Rtl {
                    spans.reverse();
                }
            }

            let font_size = spans
                .iter()
                .map(|s| s.style.font_size)
                .fold(0.0_f32, f32::max);
            let height = font_size * crate::LINE_HEIGHT_FACTOR;
            let baseline = y + (height - font_size) / 2.0 + self.measure.ascent(font_size);

            let start_x = match frame.align {
                TextAlign::Center => frame.x + (frame.width - line.width) / 2.0,
                TextAlign::Left => frame.x,
            };

            let mut cursor = start_x;
            let positioned: Vec<PositionedSpan> = spans
                .into_iter()
                .map(|span| {
                    let x = cursor + span.margin_left;
                    let width = self.measure.text_width(&span.text, &span.style);
                    cursor = x + width;
                    PositionedSpan {
                        text: span.text,
                        style: span.style,
                        x,
                        width,
                    }
                })
                .collect();

            out.push(LineBox {
                role,
                bounds: Rect::new(start_x, y, cursor - start_x, height),
                baseline,
                align: frame.align,
                direction,
                spans: positioned,
            });
            y += height;
        }

        out
    }
}

fn body(text: &str) -> Span {
    Span::new(text, TextStyle::sized(BODY_FONT_SIZE))
}

fn note(size: f32) -> TextStyle {
    TextStyle::sized(size).italic().color(TextColor::MUTED)
}

fn mourner_spans(party: &MourningParty) -> Vec<Span> {
    let mut spans = vec![Span::new(
        party.name.trim(),
        TextStyle::default().weight(FontWeight::SemiBold),
    )];
    if let Some(relationship) = party.relationship_label() {
        spans.push(
            Span::new(format!("({})", relationship), note(12.5))
                .with_margin_left(RELATIONSHIP_MARGIN),
        );
    }
    spans
}
