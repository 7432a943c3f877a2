//! Search schema description
//!
//! Static description of the tables the compiler joins. The compiler only
//! reads this; it never discovers relations at runtime.

use super::params::{Field, Matching};

/// The searchable resource table
#[derive(Debug)]
pub struct ResourceTable {
    pub table: &'static str,
    pub id_column: &'static str,
    /// `int4range` column holding the half-open date interval
    pub date_column: &'static str,
    /// Select list of the final query
    pub columns: &'static [&'static str],
}

/// One join from an already joined table (or the resource) to the next
#[derive(Debug)]
pub struct JoinStep {
    pub table: &'static str,
    pub alias: &'static str,
    /// Column on the joined table
    pub column: &'static str,
    /// Alias of the table joined against
    pub parent: &'static str,
    pub parent_column: &'static str,
    /// Role tag required on an association table
    pub role: Option<&'static str>,
}

/// Join path from the resource to the table holding a field's names
#[derive(Debug)]
pub struct FieldRelation {
    pub field: Field,
    pub path: &'static [JoinStep],
    /// Column compared with the field's values, on the last step's table
    pub target_column: &'static str,
    pub matching: Matching,
}

impl FieldRelation {
    /// Alias of the table holding [`Self::target_column`]
    pub fn target_alias(&self) -> &'static str {
        self.path.last().map(|step| step.alias).unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct SearchSchema {
    pub resource: ResourceTable,
    pub relations: &'static [FieldRelation],
}

impl SearchSchema {
    pub fn relation(&self, field: Field) -> Option<&FieldRelation> {
        self.relations.iter().find(|r| r.field == field)
    }
}

/// Schema of the iconography collection
pub static ICONOGRAPHY: SearchSchema = SearchSchema {
    resource: ResourceTable {
        table: "iconography",
        id_column: "id",
        date_column: "date",
        columns: &[
            "iconography.id",
            "iconography.id_uuid",
            "iconography.id_richelieu",
            "iconography.iiif_url",
            "iconography.source_url",
            "iconography.date_source",
            "iconography.date_corr",
            "lower(iconography.date) AS date_lower",
            "upper(iconography.date) AS date_upper",
            "iconography.technique",
            "iconography.description",
            "iconography.inscription",
            "iconography.corpus",
            "iconography.inventory_number",
            "iconography.produced",
            "iconography.represents",
            "(SELECT main_title.entry_name FROM title AS main_title \
             WHERE main_title.id_iconography = iconography.id AND main_title.ismain \
             ORDER BY main_title.id LIMIT 1) AS main_title",
        ],
    },
    relations: &[
        FieldRelation {
            field: Field::Title,
            path: &[JoinStep {
                table: "title",
                alias: "title",
                column: "id_iconography",
                parent: "iconography",
                parent_column: "id",
                role: None,
            }],
            target_column: "entry_name",
            matching: Matching::Substring,
        },
        FieldRelation {
            field: Field::Author,
            path: &[
                JoinStep {
                    table: "r_iconography_actor",
                    alias: "author_link",
                    column: "id_iconography",
                    parent: "iconography",
                    parent_column: "id",
                    role: Some("author"),
                },
                JoinStep {
                    table: "actor",
                    alias: "author",
                    column: "id",
                    parent: "author_link",
                    parent_column: "id_actor",
                    role: None,
                },
            ],
            target_column: "entry_name",
            matching: Matching::Substring,
        },
        FieldRelation {
            field: Field::Publisher,
            path: &[
                JoinStep {
                    table: "r_iconography_actor",
                    alias: "publisher_link",
                    column: "id_iconography",
                    parent: "iconography",
                    parent_column: "id",
                    role: Some("publisher"),
                },
                JoinStep {
                    table: "actor",
                    alias: "publisher",
                    column: "id",
                    parent: "publisher_link",
                    parent_column: "id_actor",
                    role: None,
                },
            ],
            target_column: "entry_name",
            matching: Matching::Substring,
        },
        FieldRelation {
            field: Field::Theme,
            path: &[
                JoinStep {
                    table: "r_iconography_theme",
                    alias: "theme_link",
                    column: "id_iconography",
                    parent: "iconography",
                    parent_column: "id",
                    role: None,
                },
                JoinStep {
                    table: "theme",
                    alias: "theme",
                    column: "id",
                    parent: "theme_link",
                    parent_column: "id_theme",
                    role: None,
                },
            ],
            target_column: "entry_name",
            matching: Matching::Exact,
        },
        FieldRelation {
            field: Field::NamedEntity,
            path: &[
                JoinStep {
                    table: "r_iconography_named_entity",
                    alias: "named_entity_link",
                    column: "id_iconography",
                    parent: "iconography",
                    parent_column: "id",
                    role: None,
                },
                JoinStep {
                    table: "named_entity",
                    alias: "named_entity",
                    column: "id",
                    parent: "named_entity_link",
                    parent_column: "id_named_entity",
                    role: None,
                },
            ],
            target_column: "entry_name",
            matching: Matching::Exact,
        },
        FieldRelation {
            field: Field::Institution,
            path: &[
                JoinStep {
                    table: "r_institution",
                    alias: "institution_link",
                    column: "id_iconography",
                    parent: "iconography",
                    parent_column: "id",
                    role: None,
                },
                JoinStep {
                    table: "institution",
                    alias: "institution",
                    column: "id",
                    parent: "institution_link",
                    parent_column: "id_institution",
                    role: None,
                },
            ],
            target_column: "entry_name",
            matching: Matching::Exact,
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_value_field_has_a_relation() {
        for field in Field::ALL {
            let relation = ICONOGRAPHY.relation(field);
            match field.matching() {
                Some(matching) => {
                    let relation = relation.unwrap();
                    assert_eq!(relation.matching, matching);
                    assert!(!relation.path.is_empty());
                }
                None => assert!(relation.is_none()),
            }
        }
    }

    #[test]
    fn test_paths_start_at_resource() {
        for relation in ICONOGRAPHY.relations {
            assert_eq!(relation.path[0].parent, ICONOGRAPHY.resource.table);
            for pair in relation.path.windows(2) {
                assert_eq!(pair[1].parent, pair[0].alias);
            }
        }
    }

    #[test]
    fn test_aliases_are_unique() {
        let mut aliases: Vec<&str> = ICONOGRAPHY
            .relations
            .iter()
            .flat_map(|r| r.path.iter().map(|s| s.alias))
            .collect();
        let total = aliases.len();
        aliases.sort_unstable();
        aliases.dedup();
        assert_eq!(aliases.len(), total);
        assert!(!aliases.contains(&ICONOGRAPHY.resource.table));
    }

    #[test]
    fn test_author_and_publisher_share_association_with_roles() {
        let author = ICONOGRAPHY.relation(Field::Author).unwrap();
        let publisher = ICONOGRAPHY.relation(Field::Publisher).unwrap();
        assert_eq!(author.path[0].table, publisher.path[0].table);
        assert_eq!(author.path[0].role, Some("author"));
        assert_eq!(publisher.path[0].role, Some("publisher"));
        assert_eq!(author.target_alias(), "author");
    }
}
