//! Tipos de Erro do DRD

use crate::sys::Errno;

/// Erros de inicialização do DRD / probe do DWC2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrdError {
    /// Fornecedor de cabo ainda não disponível: tentar o probe de novo.
    /// Carrega o código original do fornecedor, sem tradução.
    RetryLater(Errno),
    /// Inscrição no fornecedor de cabo falhou (fatal)
    Registration(Errno),
    /// Propriedade de configuração inválida
    InvalidConfig,
    /// Recurso MMIO ausente
    NoResource,
}

impl DrdError {
    /// Retorna descrição legível do erro
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RetryLater(_) => "Fornecedor de cabo indisponível, probe adiado",
            Self::Registration(_) => "Falha ao inscrever no fornecedor de cabo",
            Self::InvalidConfig => "Configuração dr_mode inválida",
            Self::NoResource => "Recurso MMIO ausente",
        }
    }

    /// Código para o driver core
    pub fn to_errno(self) -> Errno {
        match self {
            Self::RetryLater(e) | Self::Registration(e) => e,
            Self::InvalidConfig => Errno::EINVAL,
            Self::NoResource => Errno::ENXIO,
        }
    }
}

impl core::fmt::Display for DrdError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tipo Result específico do DRD
pub type DrdResult<T> = Result<T, DrdError>;
