pub mod bellman_ford;
pub mod mcmf;
pub mod residual;
