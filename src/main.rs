use mol_domain::{DescriptorSet, MoleculeRecord};
use mol_pubchem::CompoundSource;
use mol_service::MoleculeService;
use std::error::Error;
use std::fs;
use std::io::{self, Write};

/// Pequeño menú interactivo sobre el pipeline de consulta de compuestos
/// (`mol-service`). Hace las veces de la capa de presentación: los widgets
/// de renderizado reales (visor 3D, editor de estructuras) son
/// colaboradores externos; aquí solo se guardan en disco los artefactos
/// que ellos consumen (PNG, SDF, SMILES, JSON).
///
/// Opciones soportadas:
/// 1) Buscar candidatos (autocompletar)
/// 2) Consultar compuesto
/// 3) Historial reciente
/// 4) Descriptores desde archivo .mol
/// 5) Salir
fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Inicializar servicio (el historial queda deshabilitado si no hay
    // MOLVISTA_DB_URL / DATABASE_URL configurada)
    let service = MoleculeService::from_env().map_err(|e| Box::new(e) as Box<dyn Error>)?;
    if !service.history_enabled() {
        println!("(historial deshabilitado: configure MOLVISTA_DB_URL para persistir búsquedas)");
    }

    loop {
        println!("\n== MolVista menu ==");
        println!("1) Buscar candidatos (autocompletar)");
        println!("2) Consultar compuesto");
        println!("3) Historial reciente");
        println!("4) Descriptores desde archivo .mol");
        println!("5) Salir");
        print!("Elige una opción: ");
        io::stdout().flush().ok();

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;
        match choice.trim() {
            "1" => {
                let query = prompt("Texto a buscar (mínimo 2 caracteres): ")?;
                let titles = service.candidates(query.trim());
                if titles.is_empty() {
                    println!("Sin candidatos para '{}'", query.trim());
                } else {
                    for (i, t) in titles.iter().enumerate() {
                        println!("{:>2}) {}", i + 1, t);
                    }
                }
            }
            "2" => {
                let name = prompt("Nombre del compuesto (ej: aspirin): ")?;
                match service.lookup(name.trim()) {
                    Ok(record) => {
                        print_record(name.trim(), &record);
                        offer_artifacts(&service, name.trim(), &record)?;
                    }
                    Err(e) => eprintln!("Error consultando '{}': {}", name.trim(), e),
                }
            }
            "3" => {
                let rows = service.recent();
                if rows.is_empty() {
                    println!("Historial vacío (o no disponible)");
                } else {
                    println!("\nCOMPUESTO            | CID      | FÓRMULA      | FECHA");
                    println!("--------------------------------------------------------------");
                    for r in rows {
                        println!("{:<20} | {:<8} | {:<12} | {}",
                                 r.compound_name,
                                 r.cid,
                                 r.formula,
                                 r.searched_at().format("%Y-%m-%d %H:%M"));
                    }
                }
            }
            "4" => {
                let path = prompt("Ruta del archivo .mol: ")?;
                match fs::read_to_string(path.trim()) {
                    Ok(molblock) => {
                        let ds = service.descriptors_for_molblock(&molblock);
                        if ds.is_empty() {
                            println!("Estructura no interpretable (o RDKit no disponible)");
                        } else {
                            print_descriptors(&ds);
                        }
                    }
                    Err(e) => eprintln!("No se pudo leer el archivo: {}", e),
                }
            }
            "5" => {
                println!("Saliendo...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
            }
        }
    }

    Ok(())
}

fn print_record(name: &str, record: &MoleculeRecord) {
    println!("\n== {} ==", name);
    println!("CID PubChem      : {}", record.cid());
    println!("Fórmula          : {}", record.formula());
    println!("Peso molecular   : {} g/mol", record.weight());
    println!("Nombre IUPAC     : {}", record.iupac_name());
    println!("SMILES           : {}", record.smiles());
    println!("Estructura 3D    : {}",
             if record.molblock().is_available() { "disponible (SDF)" } else { "N/A" });
    if record.descriptors().is_empty() {
        println!("Descriptores     : sin datos");
    } else {
        print_descriptors(record.descriptors());
    }
    println!("Ver en PubChem   : https://pubchem.ncbi.nlm.nih.gov/compound/{}", record.cid());
}

fn print_descriptors(ds: &DescriptorSet) {
    let fmt_f = |v: Option<f64>| v.map(|x| format!("{:.2}", x)).unwrap_or_else(|| "N/A".into());
    let fmt_u = |v: Option<u32>| v.map(|x| x.to_string()).unwrap_or_else(|| "N/A".into());
    println!("LogP             : {}", fmt_f(ds.logp));
    println!("TPSA             : {} Å²", fmt_f(ds.tpsa));
    println!("Donantes HB      : {}", fmt_u(ds.hbd));
    println!("Aceptores HB     : {}", fmt_u(ds.hba));
    println!("Enlaces rotables : {}", fmt_u(ds.rotatable_bonds));
    println!("Anillos          : {} ({} aromáticos)", fmt_u(ds.ring_count), fmt_u(ds.aromatic_ring_count));
}

/// Guarda en disco los artefactos que consumen los colaboradores de
/// renderizado: imágenes PNG 2D/3D, el SDF para el visor interactivo, el
/// SMILES como texto plano y el registro completo como JSON.
fn offer_artifacts<S: CompoundSource>(service: &MoleculeService<S>,
                                      name: &str,
                                      record: &MoleculeRecord)
                                      -> Result<(), Box<dyn Error>> {
    let answer = prompt("¿Guardar artefactos? (png2d/png3d/sdf/smiles/json/no): ")?;
    match answer.trim() {
        "png2d" => match service.source().png_2d(record.cid()) {
            Ok(bytes) => save(&format!("{}_2D.png", name), &bytes)?,
            Err(e) => eprintln!("Imagen 2D no disponible: {}", e),
        },
        "png3d" => match service.source().png_3d(record.cid()) {
            Ok(bytes) => save(&format!("{}_3D.png", name), &bytes)?,
            Err(e) => eprintln!("Imagen 3D no disponible: {}", e),
        },
        "sdf" => match record.molblock().value() {
            Some(sdf) => save(&format!("{}.sdf", name), sdf.as_bytes())?,
            None => eprintln!("El registro no trae estructura 3D"),
        },
        "smiles" => match record.smiles().value() {
            Some(smiles) => save(&format!("{}_smiles.txt", name), smiles.as_bytes())?,
            None => eprintln!("El registro no trae SMILES"),
        },
        "json" => {
            let body = serde_json::to_string_pretty(record)?;
            save(&format!("{}.json", name), body.as_bytes())?;
        }
        _ => {}
    }
    Ok(())
}

fn save(path: &str, bytes: &[u8]) -> io::Result<()> {
    fs::write(path, bytes)?;
    println!("Guardado: {}", path);
    Ok(())
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
