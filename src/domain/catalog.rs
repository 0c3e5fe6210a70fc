use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::domain::entities::schema::{ColumnDef, DatasetSchema, FilterDescriptor, MatchMode};
use crate::domain::error::{BrowserError, BrowserResult};

/// Immutable catalog of the datasets the browser knows about.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<DatasetSchema>,
}

impl SchemaRegistry {
    /// Validates identifiers, control id uniqueness and filter columns.
    pub fn new(schemas: Vec<DatasetSchema>) -> BrowserResult<Self> {
        let mut seen_keys = HashSet::new();
        let mut seen_controls = HashSet::new();

        for schema in &schemas {
            if !seen_keys.insert(schema.key) {
                return Err(BrowserError::DuplicateDataset {
                    key: schema.key.to_string(),
                });
            }
            ensure_identifier(schema.relation_name)?;
            for column in &schema.columns {
                ensure_identifier(column.id)?;
            }
            for column in &schema.order_by {
                ensure_identifier(column)?;
            }

            for filter in &schema.filters {
                if !schema.has_column(filter.column()) {
                    return Err(BrowserError::SchemaColumnMismatch {
                        dataset: schema.key.to_string(),
                        filter_id: filter.value_key().to_string(),
                        column: filter.column().to_string(),
                    });
                }
                for id in filter.control_ids() {
                    if !seen_controls.insert(id) {
                        return Err(BrowserError::DuplicateControlId { id: id.to_string() });
                    }
                }
            }
        }

        Ok(Self { schemas })
    }

    pub fn builtin() -> BrowserResult<Self> {
        Self::new(vec![graduacao(), especializacao(), pos()])
    }

    pub fn get_schema(&self, key: &str) -> BrowserResult<&DatasetSchema> {
        self.schemas
            .iter()
            .find(|schema| schema.key == key)
            .ok_or_else(|| BrowserError::NotFound {
                key: key.to_string(),
            })
    }

    pub fn schemas(&self) -> &[DatasetSchema] {
        &self.schemas
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.schemas.iter().map(|schema| schema.key).collect()
    }
}

fn ensure_identifier(name: &str) -> BrowserResult<()> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(first) if first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(BrowserError::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}

fn value_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn categorical(
    id: &'static str,
    column: &'static str,
    label: &'static str,
    placeholder: &'static str,
) -> FilterDescriptor {
    FilterDescriptor::Categorical {
        id,
        column,
        match_mode: MatchMode::Exact,
        label,
        placeholder,
    }
}

fn substring(
    id: &'static str,
    column: &'static str,
    label: &'static str,
    placeholder: &'static str,
) -> FilterDescriptor {
    FilterDescriptor::Categorical {
        id,
        column,
        match_mode: MatchMode::Substring,
        label,
        placeholder,
    }
}

fn graduacao() -> DatasetSchema {
    DatasetSchema {
        key: "graduacao",
        label: "Graduação",
        relation_name: "graduacao",
        order_by: vec!["nome_curso", "nome_ies", "municipio"],
        columns: vec![
            ColumnDef::plain("nome_ies", "Instituição"),
            ColumnDef::plain("nome_curso", "Curso"),
            ColumnDef::plain("municipio", "Município"),
            ColumnDef::plain("uf", "UF"),
            ColumnDef::plain("grau", "Grau"),
            ColumnDef::plain("modalidade", "Modalidade"),
            ColumnDef::plain("area_conhecimento", "Área"),
            ColumnDef::plain("vagas_autorizadas", "Vagas autorizadas"),
        ],
        filters: vec![
            substring("grad-curso", "nome_curso", "Nome do curso", "Filtrar curso"),
            categorical(
                "grad-area",
                "area_conhecimento",
                "Área de conhecimento",
                "Filtrar área",
            ),
            categorical("grad-ies", "nome_ies", "Instituição", "Filtrar instituição"),
            categorical("grad-uf", "uf", "UF", "Filtrar estado"),
            categorical(
                "grad-municipio",
                "municipio",
                "Município",
                "Filtrar município",
            ),
            categorical("grad-grau", "grau", "Grau", "Filtrar grau"),
            categorical(
                "grad-modalidade",
                "modalidade",
                "Modalidade",
                "Filtrar modalidade",
            ),
        ],
        default_filter_values: BTreeMap::from([
            (
                "grad-grau",
                value_set(&["Bacharelado", "Licenciatura", "Tecnológico"]),
            ),
            ("grad-modalidade", value_set(&["Educação Presencial"])),
        ]),
    }
}

fn especializacao() -> DatasetSchema {
    DatasetSchema {
        key: "especializacao",
        label: "Especialização",
        relation_name: "especializacao",
        order_by: vec!["nome_especializacao", "nome_ies", "municipio"],
        columns: vec![
            ColumnDef::plain("nome_ies", "Instituição"),
            ColumnDef::plain("nome_especializacao", "Curso"),
            ColumnDef::plain("municipio", "Município"),
            ColumnDef::plain("uf", "UF"),
            ColumnDef::plain("modalidade", "Modalidade"),
            ColumnDef::plain("carga_horaria", "Carga horária"),
            ColumnDef::plain("duracao_meses", "Duração (meses)"),
            ColumnDef::plain("area_conhecimento", "Área"),
        ],
        filters: vec![
            categorical(
                "esp-curso",
                "nome_especializacao",
                "Nome do curso",
                "Ex.: Engenharia de Software",
            ),
            categorical(
                "esp-area",
                "area_conhecimento",
                "Área de conhecimento",
                "Filtrar área",
            ),
            categorical("esp-ies", "nome_ies", "Instituição", "Filtrar instituição"),
            categorical(
                "esp-modalidade",
                "modalidade",
                "Modalidade",
                "Filtrar modalidade",
            ),
            categorical("esp-uf", "uf", "UF", "Filtrar estado"),
            categorical(
                "esp-municipio",
                "municipio",
                "Município",
                "Filtrar município",
            ),
            FilterDescriptor::Range {
                min_id: "esp-carga-min",
                max_id: "esp-carga-max",
                column: "carga_horaria",
                labels: ("Carga horária mínima", "Carga horária máxima"),
                placeholders: ("180", "1440"),
            },
            FilterDescriptor::Range {
                min_id: "esp-duracao-min",
                max_id: "esp-duracao-max",
                column: "duracao_meses",
                labels: ("Duração mínima (meses)", "Duração máxima (meses)"),
                placeholders: ("3", "48"),
            },
        ],
        default_filter_values: BTreeMap::new(),
    }
}

fn pos() -> DatasetSchema {
    DatasetSchema {
        key: "pos",
        label: "Mestrado/Doutorado",
        relation_name: "pos",
        order_by: vec!["nome_programa", "sigla_ies", "municipio"],
        columns: vec![
            ColumnDef::plain("sigla_ies", "Sigla Instituição"),
            ColumnDef::plain("nome_programa", "Programa"),
            ColumnDef::plain("municipio", "Município"),
            ColumnDef::plain("uf", "UF"),
            ColumnDef::plain("area_conhecimento", "Área de conhecimento"),
            ColumnDef::plain("nota_conceito", "Nota"),
            ColumnDef::plain("nome_ies", "Instituição"),
            ColumnDef::plain("nivel_programa", "Nível"),
            ColumnDef::plain("modalidade", "Modalidade"),
            ColumnDef::link("link", "Mais informações"),
        ],
        filters: vec![
            substring(
                "pos-nome",
                "nome_programa",
                "Programa",
                "Filtrar pelo nome do programa",
            ),
            substring("pos-nivel", "nivel_programa", "Nível", "Filtrar nível"),
            categorical(
                "pos-area",
                "area_conhecimento",
                "Área de conhecimento",
                "Filtrar área",
            ),
            categorical("pos-nota", "nota_conceito", "Nota CAPES", "Filtrar nota"),
            categorical(
                "pos-modalidade",
                "modalidade",
                "Modalidade",
                "Filtrar modalidade",
            ),
            categorical("pos-uf", "uf", "UF", "Filtrar estado"),
            categorical(
                "pos-municipio",
                "municipio",
                "Município",
                "Filtrar município",
            ),
            categorical(
                "pos-sigla",
                "sigla_ies",
                "Sigla da Instituição",
                "Filtrar sigla",
            ),
            categorical(
                "pos-ies",
                "nome_ies",
                "Nome da Instituição",
                "Filtrar instituição",
            ),
        ],
        default_filter_values: BTreeMap::from([(
            "pos-nivel",
            value_set(&["MESTRADO", "DOUTORADO"]),
        )]),
    }
}
