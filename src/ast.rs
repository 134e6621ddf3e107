use crate::expr::{
    AssignData, BinaryData, CallData, ExprVisitor, GetData, GroupingData, LogicalData, SetData,
    SuperData, ThisData, UnaryData, VariableData,
};
use crate::literal::Literal;
use crate::stmt::{
    BlockData, ClassData, ExpressionData, FunctionData, IfData, PrintData, ReturnData, Stmt,
    StmtVisitor, VarData, WhileData,
};
use std::rc::Rc;

/// Renders an AST as a fully-parenthesized Lisp-like string, e.g.
/// `(+ 1 (* 2 3))`. Debugging aid only, wired to the `--ast` CLI flag.
pub struct Printer;

impl Printer {
    pub fn print_stmt(&mut self, stmt: &Stmt) -> String {
        stmt.accept(self)
    }

    fn parenthesize(&mut self, name: &str, exprs: &[&crate::expr::Expr]) -> String {
        let mut out = format!("({name}");
        for expr in exprs {
            out.push(' ');
            out.push_str(&expr.accept(self));
        }
        out.push(')');
        out
    }
}

impl ExprVisitor<String> for Printer {
    fn visit_literal_expr(&mut self, literal: &Literal) -> String {
        literal.to_string()
    }

    fn visit_grouping_expr(&mut self, grouping: &GroupingData) -> String {
        self.parenthesize("group", &[&grouping.expr])
    }

    fn visit_unary_expr(&mut self, unary: &UnaryData) -> String {
        self.parenthesize(&unary.operator.lexeme, &[&unary.expr])
    }

    fn visit_binary_expr(&mut self, binary: &BinaryData) -> String {
        self.parenthesize(&binary.operator.lexeme, &[&binary.left, &binary.right])
    }

    fn visit_logical_expr(&mut self, logical: &LogicalData) -> String {
        self.parenthesize(&logical.operator.lexeme, &[&logical.left, &logical.right])
    }

    fn visit_variable_expr(&mut self, variable: &VariableData) -> String {
        variable.name.lexeme.clone()
    }

    fn visit_assign_expr(&mut self, assign: &AssignData) -> String {
        self.parenthesize(&format!("= {}", assign.name.lexeme), &[&assign.value])
    }

    fn visit_call_expr(&mut self, call: &CallData) -> String {
        let mut exprs: Vec<&crate::expr::Expr> = vec![&call.callee];
        exprs.extend(call.arguments.iter());
        self.parenthesize("call", &exprs)
    }

    fn visit_get_expr(&mut self, get: &GetData) -> String {
        self.parenthesize(&format!(". {}", get.name.lexeme), &[&get.object])
    }

    fn visit_set_expr(&mut self, set: &SetData) -> String {
        self.parenthesize(&format!("set {}", set.name.lexeme), &[&set.object, &set.value])
    }

    fn visit_this_expr(&mut self, _this: &ThisData) -> String {
        "this".to_string()
    }

    fn visit_super_expr(&mut self, super_: &SuperData) -> String {
        format!("(super.{})", super_.method.lexeme)
    }
}

impl StmtVisitor<String> for Printer {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> String {
        self.parenthesize("expr", &[&data.expr])
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> String {
        self.parenthesize("print", &[&data.expr])
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> String {
        match &data.initializer {
            Some(initializer) => self.parenthesize(&format!("var {}", data.name.lexeme), &[initializer]),
            None => format!("(var {})", data.name.lexeme),
        }
    }

    fn visit_block_stmt(&mut self, data: &BlockData) -> String {
        let mut out = "(block".to_string();
        for stmt in &data.statements {
            out.push(' ');
            out.push_str(&stmt.accept(self));
        }
        out.push(')');
        out
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> String {
        let mut out = format!("(if {}", data.condition.accept(self));
        out.push(' ');
        out.push_str(&data.then_branch.accept(self));
        if let Some(else_branch) = &data.else_branch {
            out.push(' ');
            out.push_str(&else_branch.accept(self));
        }
        out.push(')');
        out
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> String {
        format!("(while {} {})", data.condition.accept(self), data.body.accept(self))
    }

    fn visit_function_stmt(&mut self, data: &Rc<FunctionData>) -> String {
        let params = data.params.iter().map(|p| p.lexeme.clone()).collect::<Vec<_>>().join(" ");
        let mut out = format!("(fun {}({})", data.name.lexeme, params);
        for stmt in &data.body {
            out.push(' ');
            out.push_str(&stmt.accept(self));
        }
        out.push(')');
        out
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> String {
        match &data.value {
            Some(value) => self.parenthesize("return", &[value]),
            None => "(return)".to_string(),
        }
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> String {
        let mut out = format!("(class {}", data.name.lexeme);
        if let Some(superclass) = &data.superclass {
            out.push_str(&format!(" < {}", superclass.accept(self)));
        }
        for method in &data.methods {
            out.push(' ');
            out.push_str(&self.visit_function_stmt(method));
        }
        out.push(')');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn print_source(source: &str) -> String {
        let (tokens, errors) = Scanner::new(source).scan_tokens();
        assert!(errors.is_empty());
        let (statements, errors) = Parser::new(tokens).parse();
        assert!(errors.is_empty(), "{errors:?}");
        let mut printer = Printer;
        statements.iter().map(|s| printer.print_stmt(s)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn parenthesizes_binary_precedence() {
        assert_eq!(print_source("1 + 2 * 3;"), "(expr (+ 1 (* 2 3)))");
    }

    #[test]
    fn parenthesizes_grouping() {
        assert_eq!(print_source("(1 + 2) * 3;"), "(expr (* (group (+ 1 2)) 3))");
    }
}
