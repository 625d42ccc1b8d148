use crate::{AttributeContext, OracleRequest};

pub const ATTRIBUTE_SYSTEM_PROMPT: &str = "Eres un validador de datos bancarios extremadamente permisivo y silencioso. \
Tu única tarea es detectar ERRORES CATASTRÓFICOS de coherencia entre el nombre de un atributo y su descripción \
(ej: Fecha vs Dinero), tomando como referencia la nomenclatura BIAN.\n\n\
REGLAS OBLIGATORIAS:\n\
1. IGNORA discrepancias de negocio: si el atributo es 'client_id' y la descripción dice 'Unidad de Negocio', ES VÁLIDO.\n\
2. IGNORA descripciones vagas como 'identificador' o 'código'.\n\
3. SOLO REPORTA CONTRADICCIONES IMPOSIBLES, por ejemplo 'fecha_nacimiento' descrito como 'Saldo en pesos'.\n\
4. Ante la mínima duda, NO REPORTES NADA y devuelve una lista vacía.\n\n\
Devuelve un JSON con 'issues' SOLO para esos casos.";

pub const STATUS_SYSTEM_PROMPT: &str = "Eres un revisor de contratos de APIs REST. Recibes la tabla de códigos HTTP \
declarados (código, alias, descripción). Reporta SOLO contradicciones catastróficas entre el código y su \
significado, por ejemplo un 200 descrito como error o un 404 descrito como éxito. Ante la mínima duda, no \
reportes nada. Devuelve un JSON con 'issues'.";

/// System and user messages for one request.
pub fn render(request: &OracleRequest) -> (&'static str, String) {
    match request {
        OracleRequest::Attributes { context, items } => {
            let origin = match context {
                AttributeContext::Contract => "contrato de la API",
                AttributeContext::Backend => "mapeo de backend",
            };
            let user = format!(
                "Origen: {origin}\nAnaliza:\n{}\n\nJSON output: {{ \"issues\": [ {{ \"attribute\": \"...\", \"suggestion\": \"...\", \"reason\": \"...\" }} ] }}",
                serde_json::to_string(items).unwrap_or_default()
            );
            (ATTRIBUTE_SYSTEM_PROMPT, user)
        }
        OracleRequest::StatusCodes { items } => {
            let user = format!(
                "Analiza:\n{}\n\nJSON output: {{ \"issues\": [ {{ \"code\": 0, \"message\": \"...\", \"suggestion\": \"...\" }} ] }}",
                serde_json::to_string(items).unwrap_or_default()
            );
            (STATUS_SYSTEM_PROMPT, user)
        }
    }
}
