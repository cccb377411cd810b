use advert_domain::{AdvertiseModel, ConfirmAdvertise, FieldMapper};
use advert_persistence::DieselDocumentStore;
use advert_service::{AdvertiseStorageService, ServiceConfig};
use log::info;
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

/// Pequeño menú interactivo para administrar anuncios contra el store
/// configurado por entorno (`ADVERT_DB_URL`, `ADVERT_TABLE`, ...).
///
/// Opciones soportadas:
/// 1) Crear anuncio (queda en Pending)
/// 2) Confirmar anuncio (Active)
/// 3) Descartar anuncio (rollback)
/// 4) Ver anuncio
/// 5) Health check
/// 6) Salir
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Inicializar store (aplica migraciones embebidas si procede)
    let store = advert_persistence::new_from_env()?;
    let config = ServiceConfig::from_env()?;
    info!("servicio de anuncios listo (colección {}, modo {})", config.collection, config.confirm_mode);
    let service: AdvertiseStorageService<DieselDocumentStore, FieldMapper> =
        AdvertiseStorageService::new(Arc::new(store), Arc::new(FieldMapper), config);

    loop {
        println!("\n== Advert CLI menu ==");
        println!("1) Crear anuncio");
        println!("2) Confirmar anuncio (Active)");
        println!("3) Descartar anuncio (rollback)");
        println!("4) Ver anuncio");
        println!("5) Health check");
        println!("6) Salir");
        let choice = prompt("Elige una opción: ")?;
        match choice.trim() {
            "1" => {
                let username = prompt("Usuario: ")?;
                let title = prompt("Título: ")?;
                let description = prompt("Descripción: ")?;
                let price_s = prompt("Precio: ")?;
                let price: f64 = match price_s.trim().parse() {
                    Ok(p) => p,
                    Err(_) => {
                        eprintln!("Precio inválido");
                        continue;
                    }
                };
                let model = AdvertiseModel::new(username.trim(), title.trim(), description.trim(), price);
                match service.create(&model).await {
                    Ok(id) => println!("Anuncio creado (Pending): {}", id),
                    Err(e) => eprintln!("Error creando anuncio: {}", e),
                }
            }
            "2" | "3" => {
                let id = prompt("Id del anuncio: ")?;
                let request = if choice.trim() == "2" {
                    ConfirmAdvertise::activate(id.trim())
                } else {
                    ConfirmAdvertise::rollback(id.trim())
                };
                match service.confirm(&request).await {
                    Ok(()) => println!("Anuncio {} resuelto ({})", request.id, request.status),
                    Err(e) => eprintln!("Error confirmando anuncio: {}", e),
                }
            }
            "4" => {
                let id = prompt("Id del anuncio: ")?;
                match service.load(id.trim()).await {
                    Ok(Some(rec)) => {
                        println!("{}", serde_json::to_string_pretty(&rec)?);
                    }
                    Ok(None) => println!("No existe el anuncio {}", id.trim()),
                    Err(e) => eprintln!("Error leyendo anuncio: {}", e),
                }
            }
            "5" => match service.check_health().await {
                Ok(true) => println!("Store OK"),
                Ok(false) => println!("Store no activo"),
                Err(e) => eprintln!("Health check falló: {}", e),
            },
            "6" => {
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

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
