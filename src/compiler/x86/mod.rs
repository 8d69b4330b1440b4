/*!
 # x86
 ## About
 This module provides a DSL that models the subset of 16-bit real mode x86
 assembly language which the boot sector compiler generates, along with the
 rendering of that model into NASM source text.

 The core macro is `assembly!`. It appends `Inst` values to a buffer so that
 generated code can be written almost exactly as it will appear in the
 output, while still being checked by the Rust compiler.

 ## Example
 ```text
 assembly!{(code){
     xor %ax, %ax;
     mov %ds, %ax;
     mov %si, @{format!("message_{}", id)};
 }}
 ```

## Syntax
1. `%<register>` - The `%` prefix indicates that the next token will be a register.
2. `[%seg:%reg]` - Memory addressed through a segment override register.
3. `{expression}` - An `Immediate` which is computed when the code is generated;
    e.g. the attribute byte derived from the colour settings.
4. A literal (`0xB800`, `2000`, `' '`) is written into the output exactly as it
    is written in the macro.
5. `@label` - is a label named `label`.
6. `@{"label"}` - is a label named `label`.  The braces indicate an expression
    to be evaluated.
7. `here` - the address of the current instruction, written as `$`.
8. `{{iterable of instructions}}` - injects any iterable which contains `Inst`. This
    allows x86 code generated in helper functions to be easily injected into an
    assembly macro.
 */

pub mod assembly;
