// Esquema Diesel de la tabla de anuncios (SQLite y Postgres).
// `document` guarda el JSON de los atributos; `created_at_ts` son
// nanosegundos desde epoch.
diesel::table! {
    advertisements (id) {
        id -> Text,
        status -> Text,
        created_at_ts -> BigInt,
        document -> Text,
    }
}
