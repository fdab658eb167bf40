use crate::db;
use crate::domain::models::ShiftType;
use crate::domain::schema::{to_field_id, FieldDescriptor, FieldKind, Section};
use anyhow::Result;
use sqlx::PgPool;

struct SeedField<'a> {
    label: &'a str,
    kind: FieldKind,
    section: Section,
    required: bool,
    shift_types: &'a [ShiftType],
    order: i64,
}

/// Seed the default report schema on an empty installation so the capture
/// form is usable before an administrator has configured anything.
pub async fn seed_all(pool: &PgPool) -> Result<()> {
    seed_form_fields(pool).await
}

async fn seed_form_fields(pool: &PgPool) -> Result<()> {
    if !db::get_all_form_fields(pool).await?.is_empty() {
        return Ok(());
    }

    let defaults = vec![
        SeedField {
            label: "Overall Rating",
            kind: FieldKind::Star,
            section: Section::General,
            required: true,
            shift_types: &[],
            order: 1,
        },
        SeedField {
            label: "Mood",
            kind: FieldKind::Emoji { options: vec![] },
            section: Section::General,
            required: false,
            shift_types: &[],
            order: 2,
        },
        SeedField {
            label: "Medication Given",
            kind: FieldKind::Yesno,
            section: Section::Medical,
            required: true,
            shift_types: &[],
            order: 3,
        },
        SeedField {
            label: "Meal Eaten",
            kind: FieldKind::Dropdown {
                options: vec!["Full".into(), "Partial".into(), "Refused".into()],
            },
            section: Section::General,
            required: false,
            shift_types: &[ShiftType::Day, ShiftType::Evening],
            order: 4,
        },
        SeedField {
            label: "Sleep Quality",
            kind: FieldKind::Slider { min: 0, max: 10 },
            section: Section::Medical,
            required: false,
            shift_types: &[ShiftType::Night],
            order: 5,
        },
        SeedField {
            label: "Additional Notes",
            kind: FieldKind::Text,
            section: Section::General,
            required: false,
            shift_types: &[],
            order: 6,
        },
    ];

    for seed in defaults {
        let field = FieldDescriptor {
            id: to_field_id(seed.label),
            label: seed.label.to_string(),
            kind: seed.kind,
            section: seed.section,
            required: seed.required,
            shift_types: seed.shift_types.to_vec(),
            order: seed.order,
            placeholder: None,
        };
        db::create_form_field(pool, &field).await?;
        tracing::info!("Seeded form field {}", field.id);
    }

    Ok(())
}
