use sqlx::{Postgres, Transaction};

use crate::common::error::AppError;
use crate::config::AppState;
use crate::models::auth::Session;

// ---
// Helper RLS: A "Chave" para o Banco de Dados
// ---
/// Abre uma transação e define a variável RLS com o e-mail da sessão.
/// As policies do banco leem `current_setting('app.user_email')`.
/// O `true` do set_config restringe o valor à transação, então a conexão
/// volta limpa para a pool.
pub(crate) async fn begin_rls_transaction(
    app_state: &AppState,
    session: &Session,
) -> Result<Transaction<'static, Postgres>, AppError> {
    // O operador '?' converte automaticamente sqlx::Error -> AppError::DatabaseError
    let mut tx = app_state.db_pool.begin().await?;

    sqlx::query("SELECT set_config('app.user_email', $1, true)")
        .bind(session.email())
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}
