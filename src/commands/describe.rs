use anyhow::Result;
use colored::Colorize;
use declarative::{FieldDefinition, ResourceSchema};

use crate::Context;
use crate::resource;
use crate::ui;

pub fn run(ctx: &Context, resource_type: Option<&str>) -> Result<()> {
    let names: Vec<&str> = match resource_type {
        Some(name) => vec![name],
        None => resource::type_names().to_vec(),
    };

    for name in names {
        let schema = resource::schema_for(name)?;
        show_schema(ctx, &schema);
    }
    Ok(())
}

fn show_schema(ctx: &Context, schema: &ResourceSchema) {
    ui::header(schema.type_name());
    if !ctx.quiet && !schema.doc().is_empty() {
        ui::dim(schema.doc());
    }

    for field in schema.fields() {
        println!();
        println!("  {} {}", field.name.bold(), field_tags(field).dimmed());
        if let Some(default) = &field.default {
            ui::kv("  default", &default.to_string());
        }
        if let Some(kind) = field.references {
            ui::kv("  references", kind);
        }
        if !ctx.quiet && !field.doc.is_empty() {
            for line in field.doc.lines() {
                ui::dim(&format!("  {}", line.trim()));
            }
        }
    }
}

/// Short summary like "(property, set, read-only)"
fn field_tags(field: &FieldDefinition) -> String {
    let mut tags = vec![field.role.to_string(), field.shape.to_string()];
    if field.read_only {
        tags.push("read-only".to_string());
    }
    format!("({})", tags.join(", "))
}
