//! Pure SQL-fragment rendering (spec §4.1, component C1).
//!
//! Every function here takes the entities involved plus a target schema
//! name and returns a `String`; none of them perform I/O or fail. Per
//! REDESIGN FLAGS §9 ("Shared renderer state"), enum-name-awareness for
//! default-value casts is threaded through as an explicit `enum_names`
//! parameter rather than kept in a process-wide registry.

use std::collections::HashSet;

use schema_migrate_model::{Field, FieldType, Index, Model, Policy, PrimitiveType, Role, Trigger};

/// Double-quote an identifier.
fn quote(ident: &str) -> String {
    format!("\"{ident}\"")
}

/// `"schema"."ident"`.
fn qualify(schema: &str, ident: &str) -> String {
    format!("{}.{}", quote(schema), quote(ident))
}

/// The PostgreSQL column type for `field`, including length/precision/scale
/// and array suffix, resolving enum references against `enum_names`.
pub fn column_type(field_type: &FieldType, length: Option<u32>, precision: Option<u32>, scale: Option<u32>, schema: &str, enum_names: &HashSet<String>) -> String {
    match field_type {
        FieldType::Primitive(p) => primitive_sql(*p, length, precision, scale),
        FieldType::Enum(name) => {
            if enum_names.contains(name) {
                qualify(schema, name)
            } else {
                quote(name)
            }
        }
        FieldType::Array(inner) => format!(
            "{}[]",
            column_type(inner, length, precision, scale, schema, enum_names)
        ),
    }
}

fn primitive_sql(p: PrimitiveType, length: Option<u32>, precision: Option<u32>, scale: Option<u32>) -> String {
    match p {
        PrimitiveType::Varchar => match length {
            Some(len) => format!("VARCHAR({len})"),
            None => "TEXT".to_string(),
        },
        PrimitiveType::Decimal => match (precision, scale) {
            (Some(prec), Some(sc)) => format!("NUMERIC({prec},{sc})"),
            (Some(prec), None) => format!("NUMERIC({prec})"),
            _ => "NUMERIC".to_string(),
        },
        other => other.sql_name().to_string(),
    }
}

/// The `DEFAULT ...` clause for a field, or an empty string if it has none.
/// Enum defaults are cast as `'val'::"schema"."Enum"` (spec §4.1).
fn default_clause(field: &Field, schema: &str, enum_names: &HashSet<String>) -> String {
    let Some(value) = &field.default_value else {
        return String::new();
    };
    if let Some(enum_name) = field.field_type.enum_name() {
        if enum_names.contains(enum_name) {
            return format!(" DEFAULT '{value}'::{}", qualify(schema, enum_name));
        }
    }
    format!(" DEFAULT {value}")
}

/// The full column definition fragment: `"name" TYPE [NOT NULL] [DEFAULT ...]`.
pub fn column_definition(field: &Field, schema: &str, enum_names: &HashSet<String>) -> String {
    let ty = column_type(&field.field_type, field.length, field.precision, field.scale, schema, enum_names);
    let null_clause = if field.nullable { "" } else { " NOT NULL" };
    format!(
        "{} {}{}{}",
        quote(&field.name),
        ty,
        null_clause,
        default_clause(field, schema, enum_names)
    )
}

// ---------------------------------------------------------------- extension

/// `CREATE EXTENSION IF NOT EXISTS "name" [VERSION 'v'];`
pub fn create_extension(name: &str, version: Option<&str>) -> String {
    let mut sql = format!("CREATE EXTENSION IF NOT EXISTS {}", quote(name));
    if let Some(v) = version {
        sql.push_str(&format!(" VERSION '{v}'"));
    }
    sql.push(';');
    sql
}

/// `DROP EXTENSION IF EXISTS "name";`
pub fn drop_extension(name: &str) -> String {
    format!("DROP EXTENSION IF EXISTS {};", quote(name))
}

// --------------------------------------------------------------------- enum

/// `CREATE TYPE "schema"."Name" AS ENUM (...)`, idempotent via a `DO $$`
/// block that swallows `duplicate_object` (spec §4.1).
pub fn create_enum(schema: &str, name: &str, values: &[String]) -> String {
    let values_sql = values.iter().map(|v| format!("'{v}'")).collect::<Vec<_>>().join(", ");
    format!(
        "DO $$ BEGIN\n    CREATE TYPE {} AS ENUM ({values_sql});\nEXCEPTION WHEN duplicate_object THEN NULL;\nEND $$;",
        qualify(schema, name)
    )
}

/// `DROP TYPE IF EXISTS "schema"."Name";`
pub fn drop_enum(schema: &str, name: &str) -> String {
    format!("DROP TYPE IF EXISTS {};", qualify(schema, name))
}

// -------------------------------------------------------------------- table

/// `CREATE TABLE "schema"."Model" (fields, plus a `PRIMARY KEY` clause for
/// the `@id` field if one is declared; other constraints come from the
/// relation/index orchestrators).
pub fn create_table(schema: &str, model: &Model, enum_names: &HashSet<String>) -> String {
    let mut lines = model
        .fields
        .values()
        .map(|f| format!("    {}", column_definition(f, schema, enum_names)))
        .collect::<Vec<_>>();
    if let Some(id_field) = model.id_field() {
        lines.push(format!("    PRIMARY KEY ({})", quote(&id_field.name)));
    }
    format!(
        "CREATE TABLE {} (\n{}\n);",
        qualify(schema, &model.name),
        lines.join(",\n")
    )
}

/// `DROP TABLE IF EXISTS "schema"."Model";`
pub fn drop_table(schema: &str, name: &str) -> String {
    format!("DROP TABLE IF EXISTS {};", qualify(schema, name))
}

/// `ALTER TABLE ... ADD COLUMN ...;`
pub fn add_column(schema: &str, model: &str, field: &Field, enum_names: &HashSet<String>) -> String {
    format!(
        "ALTER TABLE {} ADD COLUMN {};",
        qualify(schema, model),
        column_definition(field, schema, enum_names)
    )
}

/// `ALTER TABLE ... DROP COLUMN ...;`
pub fn drop_column(schema: &str, model: &str, field: &str) -> String {
    format!(
        "ALTER TABLE {} DROP COLUMN {};",
        qualify(schema, model),
        quote(field)
    )
}

/// A single `ALTER TABLE ... ALTER COLUMN` statement per changed facet, in
/// the order TYPE, then SET/DROP DEFAULT, then SET/DROP NOT NULL (spec
/// §4.2.3). Facets that didn't change between `from`/`to` are omitted.
pub fn alter_column(schema: &str, model: &str, from: &Field, to: &Field, enum_names: &HashSet<String>) -> String {
    let table = qualify(schema, model);
    let col = quote(&to.name);
    let mut clauses = Vec::new();

    if from.field_type != to.field_type || from.length != to.length || from.precision != to.precision || from.scale != to.scale {
        let ty = column_type(&to.field_type, to.length, to.precision, to.scale, schema, enum_names);
        clauses.push(format!("ALTER TABLE {table} ALTER COLUMN {col} TYPE {ty};"));
    }
    if from.default_value != to.default_value {
        match &to.default_value {
            Some(_) => {
                let default = default_clause(to, schema, enum_names);
                // default_clause() returns " DEFAULT ..." with leading space.
                clauses.push(format!(
                    "ALTER TABLE {table} ALTER COLUMN {col} SET{default};"
                ));
            }
            None => clauses.push(format!("ALTER TABLE {table} ALTER COLUMN {col} DROP DEFAULT;")),
        }
    }
    if from.nullable != to.nullable {
        if to.nullable {
            clauses.push(format!("ALTER TABLE {table} ALTER COLUMN {col} DROP NOT NULL;"));
        } else {
            clauses.push(format!("ALTER TABLE {table} ALTER COLUMN {col} SET NOT NULL;"));
        }
    }
    clauses.join("\n")
}

// -------------------------------------------------------------- foreign key

/// `fk_<Model>_<relationName>`.
pub fn foreign_key_name(model: &str, relation: &str) -> String {
    format!("fk_{model}_{relation}")
}

/// `ALTER TABLE ... ADD CONSTRAINT fk_... FOREIGN KEY (...) REFERENCES ...`
/// Returns an empty string if `fields`/`references` are empty (a pure
/// back-reference has no FK to render, spec §4.1's renderer-never-fails
/// contract).
pub fn create_foreign_key(
    schema: &str,
    model: &str,
    relation_name: &str,
    fields: &[String],
    target_model: &str,
    references: &[String],
    on_delete: &str,
    on_update: &str,
) -> String {
    if fields.is_empty() || references.is_empty() {
        return String::new();
    }
    let cols = fields.iter().map(|f| quote(f).to_string()).collect::<Vec<_>>().join(", ");
    let ref_cols = references.iter().map(|f| quote(f).to_string()).collect::<Vec<_>>().join(", ");
    format!(
        "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({cols}) REFERENCES {} ({ref_cols}) ON DELETE {on_delete} ON UPDATE {on_update};",
        qualify(schema, model),
        quote(&foreign_key_name(model, relation_name)),
        qualify(schema, target_model),
    )
}

/// `ALTER TABLE ... DROP CONSTRAINT IF EXISTS fk_...;`
pub fn drop_foreign_key(schema: &str, model: &str, relation_name: &str) -> String {
    format!(
        "ALTER TABLE {} DROP CONSTRAINT IF EXISTS {};",
        qualify(schema, model),
        quote(&foreign_key_name(model, relation_name))
    )
}

// ------------------------------------------------------------------- index

/// The default index name: `idx_<Model>_<f1>_<f2>…[_<type>][_unique]`.
pub fn index_name(model: &str, index: &Index) -> String {
    if let Some(name) = &index.name {
        return name.clone();
    }
    let mut parts = vec![format!("idx_{model}")];
    parts.extend(index.fields.iter().cloned());
    if let Some(t) = &index.index_type {
        parts.push(t.clone());
    }
    if index.unique {
        parts.push("unique".to_string());
    }
    parts.join("_")
}

/// `CREATE [UNIQUE] INDEX "name" ON "schema"."model" [USING type] (fields) [WHERE ...];`
pub fn create_index(schema: &str, model: &str, index: &Index) -> String {
    let unique = if index.unique { "UNIQUE " } else { "" };
    let using = match &index.index_type {
        Some(t) => format!(" USING {t}"),
        None => String::new(),
    };
    let cols = index.fields.iter().map(|f| quote(f).to_string()).collect::<Vec<_>>().join(", ");
    let where_clause = match &index.where_clause {
        Some(w) => format!(" WHERE {w}"),
        None => String::new(),
    };
    format!(
        "CREATE {unique}INDEX {} ON {}{using} ({cols}){where_clause};",
        quote(&index_name(model, index)),
        qualify(schema, model),
    )
}

/// `DROP INDEX IF EXISTS "schema"."name";`
pub fn drop_index(schema: &str, model: &str, index: &Index) -> String {
    format!(
        "DROP INDEX IF EXISTS {};",
        qualify(schema, &index_name(model, index))
    )
}

// --------------------------------------------------------------------- rls

/// `ALTER TABLE ... ENABLE ROW LEVEL SECURITY;`
pub fn enable_rls(schema: &str, model: &str) -> String {
    format!("ALTER TABLE {} ENABLE ROW LEVEL SECURITY;", qualify(schema, model))
}

/// `ALTER TABLE ... DISABLE ROW LEVEL SECURITY;`
pub fn disable_rls(schema: &str, model: &str) -> String {
    format!("ALTER TABLE {} DISABLE ROW LEVEL SECURITY;", qualify(schema, model))
}

/// `ALTER TABLE ... FORCE ROW LEVEL SECURITY;`
pub fn force_rls(schema: &str, model: &str) -> String {
    format!("ALTER TABLE {} FORCE ROW LEVEL SECURITY;", qualify(schema, model))
}

/// `ALTER TABLE ... NO FORCE ROW LEVEL SECURITY;`
pub fn no_force_rls(schema: &str, model: &str) -> String {
    format!("ALTER TABLE {} NO FORCE ROW LEVEL SECURITY;", qualify(schema, model))
}

// ------------------------------------------------------------------ policy

/// `policy_<Model>_<name>`.
pub fn policy_name(model: &str, policy: &str) -> String {
    format!("policy_{model}_{policy}")
}

/// `CREATE POLICY "name" ON "schema"."model" FOR ... TO ... USING (...) [WITH CHECK (...)];`
pub fn create_policy(schema: &str, model: &str, policy: &Policy) -> String {
    let check = match &policy.check_expr {
        Some(c) => format!(" WITH CHECK ({c})"),
        None => String::new(),
    };
    format!(
        "CREATE POLICY {} ON {} FOR {} TO {} USING ({}){check};",
        quote(&policy_name(model, &policy.name)),
        qualify(schema, model),
        policy.for_clause(),
        policy.to_clause(),
        policy.using_expr,
    )
}

/// `DROP POLICY IF EXISTS "name" ON "schema"."model";`
pub fn drop_policy(schema: &str, model: &str, policy_ident: &str) -> String {
    format!(
        "DROP POLICY IF EXISTS {} ON {};",
        quote(&policy_name(model, policy_ident)),
        qualify(schema, model),
    )
}

// -------------------------------------------------------------------- role

/// `CREATE ROLE "name";`, idempotent via a `duplicate_object`-swallowing
/// `DO $$` block (spec §4.1).
pub fn create_role(name: &str) -> String {
    format!(
        "DO $$ BEGIN\n    CREATE ROLE {};\nEXCEPTION WHEN duplicate_object THEN NULL;\nEND $$;",
        quote(name)
    )
}

/// `DROP ROLE IF EXISTS "name";`
pub fn drop_role(name: &str) -> String {
    format!("DROP ROLE IF EXISTS {};", quote(name))
}

/// `GRANT priv[, priv...] ON "schema"."target" TO "role";`
pub fn grant(schema: &str, role: &Role, target: &str, privileges_sql: &str) -> String {
    format!(
        "GRANT {privileges_sql} ON {} TO {};",
        qualify(schema, target),
        quote(&role.name),
    )
}

/// `REVOKE priv[, priv...] ON "schema"."target" FROM "role";`
pub fn revoke(schema: &str, role: &Role, target: &str, privileges_sql: &str) -> String {
    format!(
        "REVOKE {privileges_sql} ON {} FROM {};",
        qualify(schema, target),
        quote(&role.name),
    )
}

// ----------------------------------------------------------------- trigger

/// `<Model>_<event>_<level>_trigger`, with the event's whitespace collapsed
/// to underscores (e.g. `User_BEFORE_UPDATE_FOR_EACH_ROW_trigger`).
pub fn trigger_name(model: &str, trigger: &Trigger) -> String {
    let event_slug = trigger.event.split_whitespace().collect::<Vec<_>>().join("_");
    let level_slug = trigger.level.sql().split_whitespace().collect::<Vec<_>>().join("_");
    format!("{model}_{event_slug}_{level_slug}_trigger")
}

/// `<triggerName>_fn`.
pub fn trigger_function_name(model: &str, trigger: &Trigger) -> String {
    format!("{}_fn", trigger_name(model, trigger))
}

/// Creates both the backing `plpgsql` function and the trigger binding in
/// one SQL block (spec §4.2.9).
pub fn create_trigger(schema: &str, model: &str, trigger: &Trigger) -> String {
    let fn_name = qualify(schema, &trigger_function_name(model, trigger));
    let trg_name = quote(&trigger_name(model, trigger));
    format!(
        "CREATE OR REPLACE FUNCTION {fn_name}() RETURNS TRIGGER AS $$\n{}\n$$ LANGUAGE plpgsql;\n\nCREATE TRIGGER {trg_name}\n    {}\n    ON {}\n    {}\n    EXECUTE FUNCTION {fn_name}();",
        trigger.execute,
        trigger.event,
        qualify(schema, model),
        trigger.level.sql(),
    )
}

/// Drops the trigger binding then its backing function.
pub fn drop_trigger(schema: &str, model: &str, trigger: &Trigger) -> String {
    format!(
        "DROP TRIGGER IF EXISTS {} ON {};\nDROP FUNCTION IF EXISTS {}();",
        quote(&trigger_name(model, trigger)),
        qualify(schema, model),
        qualify(schema, &trigger_function_name(model, trigger)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema_migrate_model::{FieldType, TriggerLevel};

    #[test]
    fn create_extension_with_version() {
        let sql = create_extension("pg_trgm", Some("1.6"));
        assert_eq!(sql, "CREATE EXTENSION IF NOT EXISTS \"pg_trgm\" VERSION '1.6';");
    }

    #[test]
    fn create_enum_is_idempotent() {
        let sql = create_enum("public", "UserRole", &["ADMIN".into(), "USER".into()]);
        assert!(sql.contains("duplicate_object"));
        assert!(sql.contains("\"public\".\"UserRole\""));
    }

    #[test]
    fn foreign_key_name_matches_naming_rule() {
        assert_eq!(foreign_key_name("Order", "user"), "fk_Order_user");
    }

    #[test]
    fn unnamed_unique_index_name_has_unique_suffix() {
        let idx = Index::new(vec!["email".into()]).unique();
        assert_eq!(index_name("User", &idx), "idx_User_email_unique");
    }

    #[test]
    fn empty_fk_fields_render_empty() {
        let sql = create_foreign_key("public", "Order", "user", &[], "User", &[], "NO ACTION", "NO ACTION");
        assert!(sql.is_empty());
    }

    #[test]
    fn enum_default_is_cast() {
        let mut field = Field::new("status", FieldType::enum_ref("OrderStatus")).with_default("PENDING");
        field.nullable = false;
        let mut enums = HashSet::new();
        enums.insert("OrderStatus".to_string());
        let def = column_definition(&field, "public", &enums);
        assert!(def.contains("'PENDING'::\"public\".\"OrderStatus\""));
    }

    #[test]
    fn trigger_function_name_has_fn_suffix() {
        let t = Trigger::new("BEFORE UPDATE", TriggerLevel::Row, "BEGIN END;");
        assert!(trigger_function_name("User", &t).ends_with("_fn"));
    }

    #[test]
    fn create_trigger_orders_event_table_then_level() {
        let t = Trigger::new("BEFORE UPDATE", TriggerLevel::Row, "BEGIN RETURN NEW; END;");
        let sql = create_trigger("public", "User", &t);
        let event_pos = sql.find("BEFORE UPDATE\n").unwrap();
        let on_pos = sql.find("ON \"public\".\"User\"").unwrap();
        let level_pos = sql.rfind("FOR EACH ROW").unwrap();
        assert!(event_pos < on_pos, "event must precede ON table");
        assert!(on_pos < level_pos, "ON table must precede level");
    }

    #[test]
    fn create_table_renders_primary_key_for_id_field() {
        use schema_migrate_model::Model;

        let mut model = Model::new("User");
        model.add_field(Field::new("id", FieldType::uuid()).id());
        model.add_field(Field::varchar("email", 255));
        let sql = create_table("public", &model, &HashSet::new());
        assert!(sql.contains("PRIMARY KEY (\"id\")"));
    }

    #[test]
    fn create_table_omits_primary_key_without_id_field() {
        use schema_migrate_model::Model;

        let mut model = Model::new("User");
        model.add_field(Field::varchar("email", 255));
        let sql = create_table("public", &model, &HashSet::new());
        assert!(!sql.contains("PRIMARY KEY"));
    }
}
