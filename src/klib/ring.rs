//! Buffer circular de capacidade fixa.
//!
//! Sem alocação: pode ser preenchido de contexto de interrupção desde que
//! protegido por um lock que mascare IRQs.

/// Buffer circular para `N` elementos `Copy`.
///
/// `N` deve ser maior que zero (verificado em tempo de compilação).
pub struct Ring<T: Copy, const N: usize> {
    buffer: [Option<T>; N],
    read_pos: usize,
    write_pos: usize,
    count: usize,
}

impl<T: Copy, const N: usize> Ring<T, N> {
    /// Cria novo buffer vazio
    pub const fn new() -> Self {
        const { assert!(N > 0, "Ring precisa de capacidade > 0") };
        Self {
            buffer: [None; N],
            read_pos: 0,
            write_pos: 0,
            count: 0,
        }
    }

    /// Adiciona elemento ao buffer.
    ///
    /// Cheio: o elemento é devolvido em `Err` e nada muda.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.count == N {
            return Err(item);
        }
        self.buffer[self.write_pos] = Some(item);
        self.write_pos = (self.write_pos + 1) % N;
        self.count += 1;
        Ok(())
    }

    /// Remove e retorna o elemento mais antigo
    pub fn pop(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        let item = self.buffer[self.read_pos].take();
        self.read_pos = (self.read_pos + 1) % N;
        self.count -= 1;
        item
    }

    /// Elemento mais recente (o último `push`)
    pub fn last(&self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        self.buffer[(self.write_pos + N - 1) % N]
    }

    /// Retorna número de elementos no buffer
    pub fn len(&self) -> usize {
        self.count
    }

    /// Verifica se buffer está vazio
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Verifica se buffer está cheio
    pub fn is_full(&self) -> bool {
        self.count == N
    }

    /// Descarta todo o conteúdo
    pub fn clear(&mut self) {
        while self.pop().is_some() {}
    }
}

impl<T: Copy, const N: usize> Default for Ring<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
