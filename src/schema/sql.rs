//! Catalog statements. All take the schema name as `$1` and, where relevant,
//! the relation name as `$2`.

pub const LIST_TABLES: &str = "\
SELECT c.relname::text AS table_name \
FROM pg_class c \
JOIN pg_namespace n ON n.oid = c.relnamespace \
WHERE n.nspname = $1 AND c.relkind IN ('r', 'p') \
ORDER BY c.relname";

pub const TABLE_COLUMNS: &str = "\
SELECT a.attname::text AS name, \
format_type(a.atttypid, a.atttypmod) AS declared_type, \
NOT a.attnotnull AS nullable, \
pg_get_expr(d.adbin, d.adrelid) AS default_expression, \
CASE WHEN t.typname IN ('bpchar', 'varchar') AND a.atttypmod > 4 THEN a.atttypmod - 4 END AS max_length, \
t.typtype::text AS type_kind, \
t.typname::text AS type_name, \
CASE WHEN t.typtype = 'e' THEN ARRAY(\
SELECT e.enumlabel::text FROM pg_enum e WHERE e.enumtypid = t.oid ORDER BY e.enumsortorder\
) END AS enum_labels \
FROM pg_attribute a \
JOIN pg_class c ON c.oid = a.attrelid \
JOIN pg_namespace n ON n.oid = c.relnamespace \
JOIN pg_type t ON t.oid = a.atttypid \
LEFT JOIN pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum \
WHERE n.nspname = $1 AND c.relname = $2 AND a.attnum > 0 AND NOT a.attisdropped \
ORDER BY a.attnum";

pub const TABLE_CONSTRAINTS: &str = "\
SELECT con.conname::text AS name, \
con.contype::text AS kind, \
ARRAY(SELECT a.attname::text FROM unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord) \
JOIN pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum ORDER BY k.ord) AS columns, \
rn.nspname::text AS ref_schema, \
rc.relname::text AS ref_table, \
ARRAY(SELECT a.attname::text FROM unnest(con.confkey) WITH ORDINALITY AS k(attnum, ord) \
JOIN pg_attribute a ON a.attrelid = con.confrelid AND a.attnum = k.attnum ORDER BY k.ord) AS ref_columns, \
con.confdeltype::text AS on_delete, \
con.confupdtype::text AS on_update, \
pg_get_constraintdef(con.oid) AS definition \
FROM pg_constraint con \
JOIN pg_class c ON c.oid = con.conrelid \
JOIN pg_namespace n ON n.oid = c.relnamespace \
LEFT JOIN pg_class rc ON rc.oid = con.confrelid \
LEFT JOIN pg_namespace rn ON rn.oid = rc.relnamespace \
WHERE n.nspname = $1 AND c.relname = $2 \
AND con.contype IN ('p', 'u', 'f', 'c') \
AND NOT (con.contype = 'c' AND con.conname LIKE '%\\_not\\_null') \
ORDER BY con.contype, con.conname";

pub const USER_TYPES: &str = "\
SELECT t.typname::text AS name, \
t.typtype::text AS kind, \
ARRAY(SELECT e.enumlabel::text FROM pg_enum e WHERE e.enumtypid = t.oid ORDER BY e.enumsortorder) AS labels, \
ARRAY(SELECT a.attname::text FROM pg_attribute a \
WHERE a.attrelid = t.typrelid AND a.attnum > 0 AND NOT a.attisdropped ORDER BY a.attnum) AS field_names, \
ARRAY(SELECT format_type(a.atttypid, a.atttypmod) FROM pg_attribute a \
WHERE a.attrelid = t.typrelid AND a.attnum > 0 AND NOT a.attisdropped ORDER BY a.attnum) AS field_types \
FROM pg_type t \
JOIN pg_namespace n ON n.oid = t.typnamespace \
LEFT JOIN pg_class c ON c.oid = t.typrelid \
WHERE n.nspname = $1 \
AND n.nspname NOT IN ('pg_catalog', 'information_schema') \
AND n.nspname NOT LIKE 'pg\\_toast%' \
AND (t.typtype = 'e' OR (t.typtype = 'c' AND c.relkind = 'c')) \
ORDER BY t.typname";

pub const LIST_VIEWS: &str = "\
SELECT c.relname::text AS name, \
c.relkind = 'm' AS materialized, \
pg_get_viewdef(c.oid, true) AS definition \
FROM pg_class c \
JOIN pg_namespace n ON n.oid = c.relnamespace \
WHERE n.nspname = $1 AND c.relkind IN ('v', 'm') \
ORDER BY c.relname";
