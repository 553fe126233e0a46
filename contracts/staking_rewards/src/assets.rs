use soroban_sdk::{log, token, Address, Env};

use crate::ContractError;

/// Pull `amount` of `token` from `from` into the ledger's custody.
pub fn transfer_in(
    env: &Env,
    token: &Address,
    from: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    transfer(env, token, from, &env.current_contract_address(), amount)
}

/// Pay `amount` of `token` out of the ledger's custody to `to`.
pub fn transfer_out(
    env: &Env,
    token: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    transfer(env, token, &env.current_contract_address(), to, amount)
}

// Any failure of the token contract aborts the enclosing entry point; the
// returned error rolls back every ledger write made before the transfer.
fn transfer(
    env: &Env,
    token: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    match token::Client::new(env, token).try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => {
            log!(env, "token transfer failed", token.clone(), amount);
            Err(ContractError::TransferFailed)
        }
    }
}
