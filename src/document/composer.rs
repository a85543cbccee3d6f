//! A4 layout of the FUT form.
//!
//! Sections are drawn top to bottom at absolute positions: institutional
//! header, title, request metadata, student and guardian data, subject,
//! description, attachments, notes, signatures and the reception stamp.
//! Fixed-height blocks move to a fresh page when they would run into the
//! footer; wrapped text moves line by line once the cursor passes the
//! footer reserve. The footer band is drawn on every page at the end.

use chrono::{DateTime, Local, NaiveDateTime};

use super::canvas::{line_height, Canvas, Rgb, TextStyle};
use super::format::{
    document_file_name, format_date_es, format_file_size, format_gender, format_time_es,
    format_timestamp_date, or_placeholder, PLACEHOLDER,
};
use super::guardian::GuardianInfo;
use super::logo::{decode_data_uri, decode_logo, is_data_uri};
use super::metrics::split_text_to_size;
use super::{pdf, ComposeOutcome, GeneratedDocument, COMPOSE_FAILED};
use crate::fut::model::FutRequest;
use crate::school::model::{Institution, Student};

const MARGIN: f64 = 12.0;
const HEADER_HEIGHT: f64 = 32.0;
const FOOTER_HEIGHT: f64 = 14.0;
/// Wrapped text continues on a new page past `page height - FOOTER_RESERVE`.
const FOOTER_RESERVE: f64 = 50.0;
const CONTINUATION_TOP: f64 = MARGIN + 20.0;
const BAR_HEIGHT: f64 = 8.0;
const SECTION_GAP: f64 = 5.0;

const METADATA_HEIGHT: f64 = 28.0;
const STUDENT_BOX_HEIGHT: f64 = 45.0;
const SUBJECT_BOX_HEIGHT: f64 = 20.0;
const MIN_DESCRIPTION_HEIGHT: f64 = 42.0;
const DESCRIPTION_LINE: f64 = 7.0;
const MIN_ATTACHMENTS_HEIGHT: f64 = 30.0;
const EMPTY_ATTACHMENTS_HEIGHT: f64 = 20.0;
const ATTACHMENT_LINE: f64 = 8.0;
const MIN_NOTES_HEIGHT: f64 = 25.0;
const NOTES_LINE: f64 = 6.0;
const SIGNATURE_HEIGHT: f64 = 40.0;
const STAMP_HEIGHT: f64 = 25.0;

pub mod palette {
    use super::Rgb;

    pub const INSTITUTIONAL_BLUE: Rgb = Rgb(25, 118, 210);
    pub const TITLE_GREY: Rgb = Rgb::grey(240);
    pub const PANEL_GREY: Rgb = Rgb::grey(245);
    pub const SIGNATURE_GREY: Rgb = Rgb::grey(248);
    pub const STUDENT_BLUE: Rgb = Rgb(33, 150, 243);
    pub const SUBJECT_ORANGE: Rgb = Rgb(255, 152, 0);
    pub const DESCRIPTION_PURPLE: Rgb = Rgb(156, 39, 176);
    pub const ATTACHMENTS_PINK: Rgb = Rgb(233, 30, 99);
    pub const NOTES_GREEN: Rgb = Rgb(139, 195, 74);
    pub const SIGNATURE_SLATE: Rgb = Rgb(96, 125, 139);
    pub const FOOTER_INDIGO: Rgb = Rgb(63, 81, 181);
}

pub const DEFAULT_INSTITUTION_NAME: &str = "INSTITUCIÓN EDUCATIVA PÚBLICA Nº 20188";
pub const DEFAULT_INSTITUTION_DETAIL: &str = "INICIAL 627 - \"Centro de Mujeres\"";
pub const DEFAULT_INSTITUTION_RUC: &str = "RUC: 20131378921";
pub const DEFAULT_INSTITUTION_CONTACT: &str =
    "Tel: (01) 1234567 | Email: contacto@institucion.edu.pe";
pub const FORM_TITLE: &str = "FORMATO ÚNICO DE TRÁMITES (FUT)";
pub const FOOTER_LEGEND: &str = "Documento generado electrónicamente - Sistema EduAssist";
pub const NO_ATTACHMENTS: &str = "No se adjuntaron documentos";
pub const NO_NOTES: &str = "Sin observaciones";

/// Builds the printable form of a FUT request.
#[derive(Debug, Clone, Copy, Default)]
pub struct FutComposer;

impl FutComposer {
    pub fn new() -> Self {
        FutComposer
    }

    /// `logo` holds bytes the caller fetched for a remote logo URL; without
    /// it the institution's `data:` logo is used when it has one.
    pub fn compose_with_logo(
        &self,
        request: &FutRequest,
        students: &[Student],
        institution: Option<&Institution>,
        logo: Option<&[u8]>,
    ) -> ComposeOutcome {
        self.compose_at(request, students, institution, logo, Local::now())
    }

    pub fn compose_at(
        &self,
        request: &FutRequest,
        students: &[Student],
        institution: Option<&Institution>,
        logo: Option<&[u8]>,
        generated_at: DateTime<Local>,
    ) -> ComposeOutcome {
        let canvas = self.layout(request, students, institution, logo, generated_at.naive_local());
        match pdf::render(&canvas) {
            Ok(bytes) => {
                let file_name =
                    document_file_name(&request.request_number, generated_at.timestamp_millis());
                log::info!(
                    "Generated {} ({} pages, {} bytes)",
                    file_name,
                    canvas.page_count(),
                    bytes.len()
                );
                ComposeOutcome::Generated(GeneratedDocument {
                    file_name,
                    pdf: bytes,
                    page_count: canvas.page_count(),
                })
            }
            Err(e) => {
                log::error!(
                    "Failed to generate FUT document for {}: {}",
                    request.request_number,
                    e
                );
                ComposeOutcome::failed(COMPOSE_FAILED)
            }
        }
    }

    /// Lays the form out without serializing it.
    pub fn layout(
        &self,
        request: &FutRequest,
        students: &[Student],
        institution: Option<&Institution>,
        logo: Option<&[u8]>,
        generated_at: NaiveDateTime,
    ) -> Canvas {
        let student = students
            .iter()
            .find(|s| s.id == request.student_enrollment_id);
        let mut form = FormLayout {
            canvas: Canvas::a4(),
            y: 0.0,
            request,
            student,
            guardian: GuardianInfo::resolve(request, student),
            institution,
            generated_at,
        };
        form.header(logo);
        form.title();
        form.metadata();
        form.student_and_guardian();
        form.subject();
        form.description();
        form.attachments();
        form.notes();
        form.signatures();
        form.reception_stamp();
        form.footers();
        form.canvas
    }
}

struct FormLayout<'a> {
    canvas: Canvas,
    y: f64,
    request: &'a FutRequest,
    student: Option<&'a Student>,
    guardian: GuardianInfo,
    institution: Option<&'a Institution>,
    generated_at: NaiveDateTime,
}

impl FormLayout<'_> {
    fn content_width(&self) -> f64 {
        self.canvas.width() - 2.0 * MARGIN
    }

    fn column_width(&self) -> f64 {
        (self.content_width() - 10.0) / 2.0
    }

    /// Lowest y a fixed block may reach.
    fn page_bottom(&self) -> f64 {
        self.canvas.height() - FOOTER_HEIGHT - 4.0
    }

    fn new_page(&mut self) {
        self.canvas.add_page();
        self.y = CONTINUATION_TOP;
    }

    fn keep_together(&mut self, height: f64) {
        if self.y + height > self.page_bottom() {
            self.new_page();
        }
    }

    fn section_bar(&mut self, title: &str, color: Rgb) {
        let width = self.content_width();
        self.canvas.fill_rect(MARGIN, self.y, width, BAR_HEIGHT, color);
        self.canvas.text(
            title,
            MARGIN + 3.0,
            self.y + 5.5,
            TextStyle::new(10.0).bold().color(Rgb::WHITE),
        );
        self.y += BAR_HEIGHT + 2.0;
    }

    /// Draws `lines` starting one step below `self.y`, continuing on new
    /// pages as needed. Returns whether a page break happened.
    fn flow_lines(&mut self, lines: &[String], step: f64, style: TextStyle) -> bool {
        let limit = self.canvas.height() - FOOTER_RESERVE;
        let mut broke = false;
        let mut cursor = self.y;
        for line in lines {
            if cursor + step > limit {
                self.new_page();
                cursor = self.y;
                broke = true;
            }
            cursor += step;
            self.canvas.text(line, MARGIN + 5.0, cursor, style);
        }
        self.y = cursor;
        broke
    }

    fn header(&mut self, logo: Option<&[u8]>) {
        let width = self.canvas.width();
        self.canvas
            .fill_rect(0.0, 0.0, width, HEADER_HEIGHT, palette::INSTITUTIONAL_BLUE);
        self.logo(logo);

        let x = MARGIN + 35.0;
        let white = |size: f64| TextStyle::new(size).color(Rgb::WHITE);
        let [name, detail, ruc, contact] = self.institution_lines();
        self.canvas.text(&name, x, 11.0, white(12.0).bold());
        self.canvas.text(&detail, x, 17.0, white(10.0).bold());
        self.canvas.text(&ruc, x, 22.0, white(9.0));
        self.canvas.text(&contact, x, 27.0, white(9.0));

        self.y = HEADER_HEIGHT + 4.0;
        self.canvas.set_stroke(palette::INSTITUTIONAL_BLUE, 0.5);
        self.canvas.line(MARGIN, self.y, width - MARGIN, self.y);
        self.canvas.set_stroke(Rgb::BLACK, 0.2);
        self.y += 6.0;
    }

    fn institution_lines(&self) -> [String; 4] {
        match self.institution {
            None => [
                DEFAULT_INSTITUTION_NAME.to_string(),
                DEFAULT_INSTITUTION_DETAIL.to_string(),
                DEFAULT_INSTITUTION_RUC.to_string(),
                DEFAULT_INSTITUTION_CONTACT.to_string(),
            ],
            Some(institution) => {
                let code = or_placeholder(
                    institution
                        .code_institution
                        .as_deref()
                        .or(institution.modular_code.as_deref()),
                );
                let address = or_placeholder(institution.address.as_deref());
                [
                    institution
                        .name
                        .as_deref()
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or(DEFAULT_INSTITUTION_NAME)
                        .to_string(),
                    format!("{} - \"{}\"", code, address),
                    format!("RUC: {}", code),
                    format!(
                        "Tel: {} | Email: {}",
                        or_placeholder(institution.contact_phone.as_deref()),
                        or_placeholder(institution.contact_email.as_deref())
                    ),
                ]
            }
        }
    }

    /// Caller-supplied bytes win over a `data:` URI on the institution. Any
    /// decoding failure draws the placeholder box.
    fn logo(&mut self, logo: Option<&[u8]>) {
        let (x, y, w, h) = (MARGIN, 8.0, 25.0, 16.0);
        let bytes = match logo {
            Some(bytes) => Ok(bytes.to_vec()),
            None => match self.institution.and_then(|i| i.logo.as_deref()) {
                Some(source) if is_data_uri(source) => decode_data_uri(source),
                _ => Err(super::logo::LogoError::UnsupportedFormat),
            },
        };
        match bytes.and_then(|b| decode_logo(&b)) {
            Ok(image) => self.canvas.image(image, x, y, w, h),
            Err(e) => {
                if logo.is_some() || self.institution.and_then(|i| i.logo.as_ref()).is_some() {
                    log::warn!("Institution logo not embedded: {}", e);
                }
                self.canvas.fill_rect(x, y, w, h, Rgb::WHITE);
                self.canvas.text(
                    "LOGO",
                    x + w / 2.0,
                    y + h / 2.0 + 1.5,
                    TextStyle::new(10.0)
                        .bold()
                        .centered()
                        .color(palette::INSTITUTIONAL_BLUE),
                );
            }
        }
    }

    fn title(&mut self) {
        let width = self.content_width();
        self.canvas
            .fill_rect(MARGIN, self.y, width, 15.0, palette::TITLE_GREY);
        self.canvas.text(
            FORM_TITLE,
            self.canvas.width() / 2.0,
            self.y + 9.5,
            TextStyle::new(14.0).bold().centered(),
        );
        self.y += 15.0 + SECTION_GAP;
    }

    fn metadata(&mut self) {
        let top = self.y;
        let width = self.content_width();
        let column = self.column_width();
        self.canvas
            .fill_rect(MARGIN, top, width, METADATA_HEIGHT, palette::PANEL_GREY);
        let divider = MARGIN + column + 5.0;
        self.canvas.line(divider, top + 2.0, divider, top + METADATA_HEIGHT - 2.0);

        let request = self.request;
        let left = MARGIN + 5.0;
        self.canvas.text(
            &format!("Nº SOLICITUD: {}", or_placeholder(Some(request.request_number.as_str()))),
            left,
            top + 9.0,
            TextStyle::new(10.0).bold(),
        );
        self.canvas.text(
            &format!(
                "TIPO: {}",
                or_placeholder(request.request_type.map(|t| t.as_str()))
            ),
            left,
            top + 16.0,
            TextStyle::new(10.0).bold(),
        );

        let right = divider + 5.0;
        self.canvas
            .text("FECHA SOLICITUD:", right, top + 7.0, TextStyle::new(9.0).bold());
        self.canvas.text(
            &format_timestamp_date(request.created_at.as_deref()),
            right,
            top + 12.0,
            TextStyle::new(9.0),
        );
        self.canvas
            .text("FECHA GENERACIÓN:", right, top + 18.0, TextStyle::new(9.0).bold());
        self.canvas.text(
            &format!(
                "{} {}",
                format_date_es(self.generated_at.date()),
                format_time_es(self.generated_at)
            ),
            right,
            top + 23.0,
            TextStyle::new(8.0),
        );
        self.y = top + METADATA_HEIGHT + 6.0;

        let urgency = match request.urgency_level {
            Some(level) => format!("{} ({})", level.as_str(), level.turnaround()),
            None => PLACEHOLDER.to_string(),
        };
        self.canvas.text(
            &format!("URGENCIA: {}", urgency),
            MARGIN,
            self.y,
            TextStyle::new(10.0).bold(),
        );
        self.canvas.text(
            &format!(
                "ESTADO: {}",
                or_placeholder(request.status.map(|s| s.as_str()))
            ),
            self.canvas.width() - MARGIN,
            self.y,
            TextStyle::new(10.0).bold().right(),
        );
        self.y += SECTION_GAP + 1.0;
    }

    fn student_and_guardian(&mut self) {
        self.keep_together(BAR_HEIGHT + 2.0 + STUDENT_BOX_HEIGHT);
        self.section_bar("DATOS DEL ESTUDIANTE Y APODERADO", palette::STUDENT_BLUE);

        let top = self.y;
        let width = self.content_width();
        let column = self.column_width();
        self.canvas.stroke_rect(MARGIN, top, width, STUDENT_BOX_HEIGHT);
        let divider = MARGIN + column + 5.0;
        self.canvas.line(divider, top + 2.0, divider, top + STUDENT_BOX_HEIGHT - 2.0);

        let heading = TextStyle::new(9.0).bold();
        let field = TextStyle::new(8.0);

        let student = self.student;
        let pick = |value: fn(&Student) -> Option<&str>| student.and_then(value);
        let student_name = student.and_then(Student::full_name);
        let document = student.map(|s| {
            let number = or_placeholder(s.document_number.as_deref());
            match s.document_type.as_deref().filter(|t| !t.trim().is_empty()) {
                Some(kind) => format!("{} {}", kind, number),
                None => number,
            }
        });
        let left_lines = [
            format!("Nombres: {}", or_placeholder(student_name.as_deref())),
            format!("Documento: {}", or_placeholder(document.as_deref())),
            format!(
                "Fecha Nac.: {}",
                format_timestamp_date(pick(|s| s.birth_date.as_deref()))
            ),
            format!("Género: {}", format_gender(pick(|s| s.gender.as_deref()))),
            format!("Dirección: {}", or_placeholder(pick(|s| s.address.as_deref()))),
            format!("Código: {}", or_placeholder(pick(|s| s.student_code.as_deref()))),
        ];

        let left = MARGIN + 5.0;
        self.canvas.text("DATOS DEL ESTUDIANTE", left, top + 7.0, heading);
        for (i, line) in left_lines.iter().enumerate() {
            self.canvas.text(line, left, top + 14.0 + 5.0 * i as f64, field);
        }

        let right = divider + 5.0;
        let guardian = &self.guardian;
        let right_lines = [
            format!("Nombre: {}", guardian.name),
            format!("DNI: {}", guardian.document),
            format!("Parentesco: {}", guardian.relationship),
            format!("Teléfono: {}", guardian.phone),
            format!("Email: {}", guardian.email),
        ];
        let address = format!(
            "Dirección: {}, {}, {}",
            guardian.address, guardian.district, guardian.province
        );
        let address_lines = split_text_to_size(&address, column - 5.0, 8.0);

        self.canvas.text("DATOS DEL APODERADO", right, top + 7.0, heading);
        for (i, line) in right_lines.iter().enumerate() {
            self.canvas.text(line, right, top + 14.0 + 5.0 * i as f64, field);
        }
        for (i, line) in address_lines.iter().take(2).enumerate() {
            self.canvas.text(line, right, top + 39.0 + 4.0 * i as f64, field);
        }

        self.y = top + STUDENT_BOX_HEIGHT + SECTION_GAP;
    }

    fn subject(&mut self) {
        self.keep_together(BAR_HEIGHT + 2.0 + SUBJECT_BOX_HEIGHT);
        self.section_bar("ASUNTO DE LA SOLICITUD", palette::SUBJECT_ORANGE);

        let top = self.y;
        let width = self.content_width();
        self.canvas.stroke_rect(MARGIN, top, width, SUBJECT_BOX_HEIGHT);
        let subject = or_placeholder(self.request.request_subject.as_deref());
        let lines = split_text_to_size(&subject, width - 10.0, 10.0);
        for (i, line) in lines.iter().take(2).enumerate() {
            self.canvas.text(
                line,
                MARGIN + 5.0,
                top + 8.0 + 6.0 * i as f64,
                TextStyle::new(10.0).bold(),
            );
        }
        self.y = top + SUBJECT_BOX_HEIGHT + SECTION_GAP;
    }

    fn description(&mut self) {
        let width = self.content_width();
        let text = or_placeholder(self.request.request_description.as_deref());
        let lines = split_text_to_size(&text, width - 10.0, 9.0);
        let height = MIN_DESCRIPTION_HEIGHT.max(lines.len() as f64 * DESCRIPTION_LINE + 8.0);

        self.keep_together(BAR_HEIGHT + 2.0 + MIN_DESCRIPTION_HEIGHT);
        self.section_bar("DESCRIPCIÓN DETALLADA", palette::DESCRIPTION_PURPLE);
        self.boxed_flow(&lines, height, DESCRIPTION_LINE, TextStyle::new(9.0));
    }

    /// Box of `height` around `lines`, clipped to the page; lines that do not
    /// fit continue unboxed on the following pages.
    fn boxed_flow(&mut self, lines: &[String], height: f64, step: f64, style: TextStyle) {
        let top = self.y;
        let width = self.content_width();
        let visible = height.min(self.page_bottom() - top);
        self.canvas.stroke_rect(MARGIN, top, width, visible);

        let broke = self.flow_lines(lines, step, style);
        self.y = if broke {
            self.y + line_height(style.size) + SECTION_GAP
        } else {
            top + height + SECTION_GAP
        };
    }

    fn attachments(&mut self) {
        let documents = &self.request.attached_documents;
        if documents.is_empty() {
            self.keep_together(BAR_HEIGHT + 2.0 + EMPTY_ATTACHMENTS_HEIGHT);
            self.section_bar("DOCUMENTOS ADJUNTOS", palette::ATTACHMENTS_PINK);
            let top = self.y;
            let width = self.content_width();
            self.canvas
                .stroke_rect(MARGIN, top, width, EMPTY_ATTACHMENTS_HEIGHT);
            self.canvas.text(
                NO_ATTACHMENTS,
                MARGIN + 5.0,
                top + 11.0,
                TextStyle::new(9.0),
            );
            self.y = top + EMPTY_ATTACHMENTS_HEIGHT + SECTION_GAP;
            return;
        }

        let lines: Vec<String> = documents
            .values()
            .enumerate()
            .map(|(i, doc)| {
                format!(
                    "{}. {} ({})",
                    i + 1,
                    or_placeholder(Some(doc.name.as_str())),
                    format_file_size(doc.size)
                )
            })
            .collect();
        let height = MIN_ATTACHMENTS_HEIGHT.max(lines.len() as f64 * ATTACHMENT_LINE + 10.0);

        self.keep_together(BAR_HEIGHT + 2.0 + MIN_ATTACHMENTS_HEIGHT);
        self.section_bar("DOCUMENTOS ADJUNTOS", palette::ATTACHMENTS_PINK);
        self.boxed_flow(&lines, height, ATTACHMENT_LINE, TextStyle::new(9.0));
    }

    fn notes(&mut self) {
        let width = self.content_width();
        let text = self
            .request
            .admin_notes
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(NO_NOTES);
        let lines = split_text_to_size(text, width - 10.0, 9.0);
        let height = MIN_NOTES_HEIGHT.max(lines.len() as f64 * NOTES_LINE + 10.0);

        self.keep_together(BAR_HEIGHT + 2.0 + MIN_NOTES_HEIGHT);
        self.section_bar("OBSERVACIONES", palette::NOTES_GREEN);
        self.boxed_flow(&lines, height, NOTES_LINE, TextStyle::new(9.0));

        if let Some(date) = self
            .request
            .estimated_delivery_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        {
            self.keep_together(6.0);
            self.canvas.text(
                &format!("FECHA ESTIMADA DE ENTREGA: {}", format_timestamp_date(Some(date))),
                MARGIN,
                self.y,
                TextStyle::new(9.0).bold(),
            );
            self.y += 6.0;
        }
    }

    fn signatures(&mut self) {
        self.keep_together(BAR_HEIGHT + 2.0 + SIGNATURE_HEIGHT);
        self.section_bar("FIRMAS", palette::SIGNATURE_SLATE);

        let top = self.y;
        let box_width = self.content_width() / 2.0 - 5.0;
        let boxes = [
            (
                MARGIN,
                "FIRMA DEL SOLICITANTE",
                format!("Apellidos y Nombres: {}", self.guardian.name),
                format!("DNI: {}", self.guardian.document),
            ),
            (
                MARGIN + box_width + 10.0,
                "FIRMA Y SELLO DE LA INSTITUCIÓN",
                "Nombre y Cargo:".to_string(),
                PLACEHOLDER.to_string(),
            ),
        ];
        for (x, heading, first, second) in boxes {
            self.canvas
                .fill_rect(x, top, box_width, SIGNATURE_HEIGHT, palette::SIGNATURE_GREY);
            self.canvas.stroke_rect(x, top, box_width, SIGNATURE_HEIGHT);
            let center = x + box_width / 2.0;
            self.canvas.text(
                heading,
                center,
                top + 7.0,
                TextStyle::new(9.0).bold().centered(),
            );
            self.canvas.line(x + 10.0, top + 26.0, x + box_width - 10.0, top + 26.0);
            self.canvas
                .text(&first, x + 5.0, top + 32.0, TextStyle::new(8.0));
            self.canvas
                .text(&second, x + 5.0, top + 37.0, TextStyle::new(8.0));
        }
        self.y = top + SIGNATURE_HEIGHT + SECTION_GAP;
    }

    fn reception_stamp(&mut self) {
        self.keep_together(STAMP_HEIGHT);
        let top = self.y;
        let width = self.content_width();
        let center = self.canvas.width() / 2.0;
        self.canvas.stroke_rect(MARGIN, top, width, STAMP_HEIGHT);
        self.canvas.text(
            "SELLO DE RECEPCIÓN",
            center,
            top + 8.0,
            TextStyle::new(10.0).bold().centered(),
        );
        self.canvas.text(
            "(Fecha y Hora de Recepción)",
            center,
            top + 14.0,
            TextStyle::new(8.0).centered(),
        );
        self.canvas.text(
            "______________________________",
            center,
            top + 21.0,
            TextStyle::new(8.0).centered(),
        );
        self.y = top + STAMP_HEIGHT + SECTION_GAP;
    }

    fn footers(&mut self) {
        let total = self.canvas.page_count();
        let width = self.canvas.width();
        let height = self.canvas.height();
        let stamp = format!(
            "Fecha de generación: {} {}",
            format_date_es(self.generated_at.date()),
            format_time_es(self.generated_at)
        );
        for index in 0..total {
            self.canvas.select_page(index);
            self.canvas.fill_rect(
                0.0,
                height - FOOTER_HEIGHT,
                width,
                FOOTER_HEIGHT,
                palette::FOOTER_INDIGO,
            );
            let white = |size: f64| TextStyle::new(size).color(Rgb::WHITE);
            self.canvas.text(
                FOOTER_LEGEND,
                width / 2.0,
                height - 8.0,
                white(9.0).bold().centered(),
            );
            self.canvas
                .text(&stamp, MARGIN, height - 3.0, white(7.0));
            self.canvas.text(
                &format!("Página {} de {}", index + 1, total),
                width - MARGIN,
                height - 3.0,
                white(7.0).right(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::canvas::DrawOp;
    use crate::document::logo::tests::tiny_jpeg;
    use crate::fut::model::{AttachedDocument, FutStatus, RequestType, UrgencyLevel};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use chrono::{NaiveDate, TimeZone};

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap()
    }

    fn student() -> Student {
        Student {
            id: "s1".into(),
            first_name: Some("Juan".into()),
            last_name: Some("Pérez".into()),
            document_type: Some("DNI".into()),
            document_number: Some("71234567".into()),
            gender: Some("MALE".into()),
            guardian_name: Some("Rosa".into()),
            guardian_last_name: Some("Pérez".into()),
            guardian_document_number: Some("45678912".into()),
            guardian_relationship: Some("MOTHER".into()),
            ..Default::default()
        }
    }

    fn request() -> FutRequest {
        FutRequest {
            id: "f1".into(),
            student_enrollment_id: "s1".into(),
            request_number: "4567JP".into(),
            request_type: Some(RequestType::Constancia),
            request_subject: Some("Constancia de estudios".into()),
            request_description: Some("Solicito constancia para trámite de beca.".into()),
            urgency_level: Some(UrgencyLevel::Media),
            status: Some(FutStatus::Pendiente),
            created_at: Some("2025-03-10T08:00:00".into()),
            ..Default::default()
        }
    }

    fn layout(request: &FutRequest, institution: Option<&Institution>) -> Canvas {
        FutComposer::new().layout(request, &[student()], institution, None, at())
    }

    #[test]
    fn test_default_institution_and_sections() {
        let canvas = layout(&request(), None);
        let texts = canvas.texts();
        for expected in [
            DEFAULT_INSTITUTION_NAME,
            DEFAULT_INSTITUTION_RUC,
            FORM_TITLE,
            "Nº SOLICITUD: 4567JP",
            "TIPO: CONSTANCIA",
            "FECHA GENERACIÓN:",
            "URGENCIA: MEDIA (Atención en 3-5 días)",
            "ESTADO: PENDIENTE",
            "Nombres: Juan Pérez",
            "Documento: DNI 71234567",
            "Género: Masculino",
            "Nombre: Juan Pérez",
            "Parentesco: Madre",
            "Constancia de estudios",
            NO_ATTACHMENTS,
            NO_NOTES,
            "SELLO DE RECEPCIÓN",
            "(Fecha y Hora de Recepción)",
            FOOTER_LEGEND,
            "LOGO",
        ] {
            assert!(texts.contains(&expected), "missing text {:?}", expected);
        }
        assert!(texts.contains(&"10/3/2025"));
    }

    #[test]
    fn test_missing_values_print_placeholder() {
        let sparse = FutRequest {
            student_enrollment_id: "nobody".into(),
            ..Default::default()
        };
        let canvas = FutComposer::new().layout(&sparse, &[], None, None, at());
        let texts = canvas.texts();
        assert!(texts.contains(&"TIPO: _______________"));
        assert!(texts.contains(&"Nombres: _______________"));
        assert!(texts.contains(&"Nombre: _______________"));
    }

    #[test]
    fn test_requested_by_names_the_guardian() {
        let mut with_requester = request();
        with_requester.requested_by = Some("Carlos Pérez".into());
        let canvas = layout(&with_requester, None);
        assert!(canvas.texts().contains(&"Nombre: Carlos Pérez"));
    }

    #[test]
    fn test_compose_succeeds_for_empty_request() {
        let generated_at = Local.with_ymd_and_hms(2025, 3, 14, 9, 30, 5).unwrap();
        let outcome =
            FutComposer::new().compose_at(&FutRequest::default(), &[], None, None, generated_at);
        let summary = outcome.summary();
        assert!(summary.success, "compose failed: {:?}", summary.error);
        assert_eq!(
            summary.file_name,
            Some(format!("FUT__{}.pdf", generated_at.timestamp_millis()))
        );
        match outcome {
            ComposeOutcome::Generated(doc) => assert!(doc.pdf.starts_with(b"%PDF")),
            ComposeOutcome::Failed { error } => panic!("compose failed: {}", error),
        }
    }

    #[test]
    fn test_institution_header_lines() {
        let institution = Institution {
            name: Some("I.E. Santa Rosa".into()),
            code_institution: Some("0456789".into()),
            address: Some("Av. Grau 120".into()),
            contact_phone: Some("014445555".into()),
            ..Default::default()
        };
        let canvas = layout(&request(), Some(&institution));
        let texts = canvas.texts();
        assert!(texts.contains(&"I.E. Santa Rosa"));
        assert!(texts.contains(&"0456789 - \"Av. Grau 120\""));
        assert!(texts.contains(&"Tel: 014445555 | Email: _______________"));
        assert!(!texts.contains(&DEFAULT_INSTITUTION_NAME));
    }

    #[test]
    fn test_footer_on_every_page() {
        let mut long = request();
        long.request_description = Some("Texto largo de la solicitud. ".repeat(120));
        let canvas = layout(&long, None);

        assert!(canvas.page_count() >= 2);
        for (i, page) in canvas.pages().iter().enumerate() {
            let texts: Vec<&str> = page.texts().collect();
            assert!(texts.contains(&FOOTER_LEGEND), "page {} lacks footer", i + 1);
            let expected = format!("Página {} de {}", i + 1, canvas.page_count());
            assert!(texts.contains(&expected.as_str()));
        }
    }

    #[test]
    fn test_nothing_drawn_into_footer_band() {
        let mut long = request();
        long.request_description = Some("Texto largo de la solicitud. ".repeat(120));
        long.admin_notes = Some("Revisar expediente. ".repeat(60));
        let canvas = layout(&long, None);
        let band_top = canvas.height() - FOOTER_HEIGHT;

        for page in canvas.pages() {
            for op in &page.ops {
                if let DrawOp::Text { y, text, .. } = op {
                    let in_footer = text == FOOTER_LEGEND
                        || text.starts_with("Página ")
                        || text.starts_with("Fecha de generación");
                    if !in_footer {
                        assert!(*y < band_top, "{:?} at y={} overlaps footer", text, y);
                    }
                }
            }
        }
    }

    #[test]
    fn test_attachments_listed_with_sizes() {
        let mut with_docs = request();
        with_docs.attached_documents.insert(
            "1_a".into(),
            AttachedDocument {
                name: "dni_apoderado.pdf".into(),
                size: 1536,
                mime_type: "application/pdf".into(),
                last_modified: None,
            },
        );
        let canvas = layout(&with_docs, None);
        let texts = canvas.texts();
        assert!(texts.contains(&"1. dni_apoderado.pdf (1.5 KB)"));
        assert!(!texts.contains(&NO_ATTACHMENTS));
    }

    #[test]
    fn test_data_uri_logo_is_embedded() {
        let institution = Institution {
            name: Some("I.E. Santa Rosa".into()),
            logo: Some(format!("data:image/jpeg;base64,{}", STANDARD.encode(tiny_jpeg()))),
            ..Default::default()
        };
        let canvas = layout(&request(), Some(&institution));
        assert_eq!(canvas.images().len(), 1);
        assert!(!canvas.texts().contains(&"LOGO"));
    }

    #[test]
    fn test_compose_produces_named_pdf() {
        let generated_at = Local.with_ymd_and_hms(2025, 3, 14, 9, 30, 5).unwrap();
        let outcome = FutComposer::new().compose_at(
            &request(),
            &[student()],
            None,
            Some(&tiny_jpeg()),
            generated_at,
        );
        match outcome {
            ComposeOutcome::Generated(doc) => {
                assert_eq!(
                    doc.file_name,
                    format!("FUT_4567JP_{}.pdf", generated_at.timestamp_millis())
                );
                assert!(doc.pdf.starts_with(b"%PDF"));
                assert_eq!(doc.page_count, 2);
            }
            ComposeOutcome::Failed { error } => panic!("compose failed: {}", error),
        }
    }
}
