//! Letterhead assets and per-report header data.

use serde::{Deserialize, Serialize};

use super::case_id::CaseId;
use crate::validation::{require_non_empty, ValidationError};

/// One header line. `{case}`, `{version}` and `{group}` are substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLine {
    pub text: String,
    #[serde(default)]
    pub bold: bool,
}

impl HeaderLine {
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }

    pub fn regular(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn render(&self, header: &ReportHeader) -> String {
        self.text
            .replace("{case}", header.case_id.as_str())
            .replace("{version}", &header.version)
            .replace("{group}", &header.group)
    }
}

/// Supplies the logo and the static text of the letterhead.
pub trait AssetProvider: Sync {
    /// Encoded logo image (PNG, JPEG or WebP), if any.
    fn logo(&self) -> Option<&[u8]>;
    fn title(&self) -> &str;
    fn header_lines(&self) -> &[HeaderLine];
    fn footer_lines(&self) -> &[String];
}

/// Assets held in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticAssets {
    pub logo: Option<Vec<u8>>,
    pub title: String,
    pub header_lines: Vec<HeaderLine>,
    pub footer_lines: Vec<String>,
}

impl Default for StaticAssets {
    fn default() -> Self {
        Self {
            logo: None,
            title: "Relatório Fotográfico".to_string(),
            header_lines: vec![
                HeaderLine::bold("Secretaria da Segurança Pública"),
                HeaderLine::bold("POLÍCIA CIVIL DO ESTADO DE SÃO PAULO"),
                HeaderLine::regular("Departamento Estadual de Homicídios e Proteção à Pessoa – DHPP"),
                HeaderLine::regular("Divisão de Homicídios \"Dr. FRANCISCO DE ASSIS CAMARGO MAGNO\""),
                HeaderLine::regular(
                    "Grupo Especial de Atendimento a Local de Crime – GEACRIM {group}",
                ),
                HeaderLine::regular("Boletim de Ocorrência {case} Versão {version}"),
            ],
            footer_lines: vec![
                "Endereço: Rua Brigadeiro Tobias, 527 – Centro – São Paulo/SP – CEP 01032-001"
                    .to_string(),
                "Telefone: (11) 3311-3980   |   Email: dhpp.dh@policiacivil.sp.gov.br".to_string(),
            ],
        }
    }
}

impl StaticAssets {
    pub fn with_logo(mut self, logo: Vec<u8>) -> Self {
        self.logo = Some(logo);
        self
    }
}

impl AssetProvider for StaticAssets {
    fn logo(&self) -> Option<&[u8]> {
        self.logo.as_deref()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn header_lines(&self) -> &[HeaderLine] {
        &self.header_lines
    }

    fn footer_lines(&self) -> &[String] {
        &self.footer_lines
    }
}

/// The data that identifies one report.
///
/// Deserialization runs the same checks as [`ReportHeader::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawReportHeader")]
pub struct ReportHeader {
    pub case_id: CaseId,
    pub version: String,
    pub group: String,
}

#[derive(Deserialize)]
struct RawReportHeader {
    case_id: String,
    version: String,
    group: String,
}

impl TryFrom<RawReportHeader> for ReportHeader {
    type Error = ValidationError;

    fn try_from(raw: RawReportHeader) -> Result<Self, ValidationError> {
        Self::new(&raw.case_id, raw.version, raw.group)
    }
}

impl ReportHeader {
    pub fn new(
        case_id: &str,
        version: impl Into<String>,
        group: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let version = version.into();
        let group = group.into();
        let case_id = CaseId::parse(case_id)?;
        require_non_empty(&version, "version")?;
        require_non_empty(&group, "group")?;
        Ok(Self {
            case_id,
            version: version.trim().to_string(),
            group: group.trim().to_string(),
        })
    }
}
