// Esquema Diesel compartido por los backends Postgres y SQLite.
// Tabla única: molecule_history (log de solo-agregado).
// searched_at_ts es época en microsegundos asignada al insertar.
diesel::table! {
    molecule_history (id) {
        id -> Text,
        compound_name -> Text,
        cid -> BigInt,
        formula -> Text,
        smiles -> Text,
        molecular_weight -> Nullable<Double>,
        molblock -> Nullable<Text>,
        logp -> Nullable<Double>,
        tpsa -> Nullable<Double>,
        searched_at_ts -> BigInt,
    }
}
